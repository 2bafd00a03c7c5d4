use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::{EngineConfig, SlotConfig};
use crate::models::{BudgetPeriod, Category, FoodItem, Goal, MealSlot, UserProfile};

/// Candidate foods per slot, borrowed from the catalog.
pub type Buckets<'a> = BTreeMap<MealSlot, Vec<&'a FoodItem>>;

/// Buckets for one request plus the relaxations applied to produce them.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub buckets: Buckets<'a>,
    /// Allergy exclusion was dropped for every slot.
    pub fallback: bool,
    /// Budget pre-filter was dropped for every slot.
    pub budget_relaxed: bool,
}

impl<'a> FilterOutcome<'a> {
    /// Buckets in positional order for `slots`.
    pub fn in_order(&self, slots: &[MealSlot]) -> Vec<Vec<&'a FoodItem>> {
        slots
            .iter()
            .map(|slot| self.buckets.get(slot).cloned().unwrap_or_default())
            .collect()
    }

    /// Required slots left without any candidate.
    pub fn empty_slots(&self, slots: &[MealSlot]) -> Vec<MealSlot> {
        slots
            .iter()
            .copied()
            .filter(|slot| self.buckets.get(slot).is_none_or(Vec::is_empty))
            .collect()
    }
}

/// Whether a food is suitable for a slot. A food may suit several slots.
pub fn qualifies_for(food: &FoodItem, slot: MealSlot, config: &SlotConfig) -> bool {
    let calories = f64::from(food.calories);
    match slot {
        MealSlot::Breakfast => {
            food.has_tag("breakfast")
                || calories < config.breakfast_max_calories
                || matches!(food.category, Category::Fruit | Category::Dairy)
        }
        MealSlot::Lunch => {
            food.has_tag("lunch")
                || (config.lunch_min_calories..=config.lunch_max_calories).contains(&calories)
                || matches!(
                    food.category,
                    Category::Burger | Category::Salad | Category::Soup
                )
        }
        MealSlot::Dinner => {
            food.has_tag("dinner")
                || calories >= config.dinner_min_calories
                || matches!(
                    food.category,
                    Category::Meat | Category::Seafood | Category::Burger
                )
        }
    }
}

/// Partition the catalog into the given slots, keeping catalog order.
pub fn build_meal_buckets<'a>(
    foods: &'a [FoodItem],
    slots: &[MealSlot],
    config: &SlotConfig,
) -> Buckets<'a> {
    slots
        .iter()
        .map(|slot| {
            let bucket = foods
                .iter()
                .filter(|food| qualifies_for(food, *slot, config))
                .collect();
            (*slot, bucket)
        })
        .collect()
}

/// Allergies are expected lowercased; an allergy matches a tag it is a
/// substring of (exact matches included).
pub fn matches_allergy_tag(food: &FoodItem, allergies: &[String]) -> bool {
    allergies
        .iter()
        .filter(|a| !a.is_empty())
        .any(|allergy| food.tags.iter().any(|tag| tag.contains(allergy.as_str())))
}

/// Broader check used for warning badges: tags or the food's name.
pub fn allergy_badge(food: &FoodItem, allergies: &[String]) -> bool {
    if matches_allergy_tag(food, allergies) {
        return true;
    }
    let name = food.name.to_lowercase();
    allergies
        .iter()
        .filter(|a| !a.is_empty())
        .any(|allergy| name.contains(&allergy.to_lowercase()))
}

/// Drop allergy-tagged foods from every bucket. No fallback is applied here.
pub fn apply_allergy_filter<'a>(buckets: &Buckets<'a>, allergies: &[String]) -> Buckets<'a> {
    retain_all(buckets, |food| !matches_allergy_tag(food, allergies))
}

fn retain_all<'a>(buckets: &Buckets<'a>, keep: impl Fn(&FoodItem) -> bool) -> Buckets<'a> {
    buckets
        .iter()
        .map(|(slot, foods)| {
            let kept = foods.iter().copied().filter(|food| keep(food)).collect();
            (*slot, kept)
        })
        .collect()
}

/// True when `after` empties some slot that had candidates in `before`.
fn empties_a_bucket(before: &Buckets<'_>, after: &Buckets<'_>) -> Option<MealSlot> {
    before
        .iter()
        .find(|(slot, foods)| !foods.is_empty() && after.get(*slot).is_none_or(Vec::is_empty))
        .map(|(slot, _)| *slot)
}

/// Reorder a bucket for the goal. Stable: ties keep catalog order.
///
/// Weight loss puts protein-category foods first, then ascending calories.
/// Muscle gain puts protein-category foods first, then descending protein.
/// Maintenance keeps catalog order.
pub fn rank_bucket(bucket: &mut [&FoodItem], goal: Goal) {
    match goal {
        Goal::WeightLoss => bucket.sort_by(|a, b| {
            b.is_protein()
                .cmp(&a.is_protein())
                .then(a.calories.cmp(&b.calories))
        }),
        Goal::MuscleGain => bucket.sort_by(|a, b| {
            b.is_protein()
                .cmp(&a.is_protein())
                .then(b.protein.partial_cmp(&a.protein).unwrap_or(Ordering::Equal))
        }),
        Goal::Maintenance => {}
    }
}

/// Build ranked, allergy-filtered buckets for a profile.
///
/// If the allergy exclusion would empty any required bucket, it is discarded
/// for all buckets and `fallback` is set; partial filtering never happens.
/// The optional budget pre-filter is relaxed the same way.
pub fn recommend_buckets<'a>(
    foods: &'a [FoodItem],
    profile: &UserProfile,
    config: &EngineConfig,
) -> FilterOutcome<'a> {
    let mut buckets = build_meal_buckets(foods, profile.slots(), &config.slots);
    let mut budget_relaxed = false;
    let mut fallback = false;

    if config.budget_prefilter {
        let per_meal = profile.budget_for(BudgetPeriod::PerMeal);
        let affordable = retain_all(&buckets, |food| food.price <= per_meal);
        match empties_a_bucket(&buckets, &affordable) {
            Some(slot) => {
                warn!(%slot, per_meal, "budget pre-filter would empty a slot; ignoring it");
                budget_relaxed = true;
            }
            None => buckets = affordable,
        }
    }

    if !profile.allergies.is_empty() {
        let safe = apply_allergy_filter(&buckets, &profile.allergies);
        match empties_a_bucket(&buckets, &safe) {
            Some(slot) => {
                warn!(%slot, allergies = ?profile.allergies, "allergy filter would empty a slot; serving unfiltered foods");
                fallback = true;
            }
            None => buckets = safe,
        }
    }

    for (slot, bucket) in buckets.iter_mut() {
        rank_bucket(bucket, profile.goal);
        if let Some(max) = config.max_candidates_per_slot {
            bucket.truncate(max);
        }
        debug!(
            %slot,
            candidates = bucket.len(),
            top = ?bucket.first().map(|f| f.debug_string()),
            "bucket ready"
        );
    }

    FilterOutcome {
        buckets,
        fallback,
        budget_relaxed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Budget, FoodId, FoodRecord, Gender, MealCount};

    fn food(id: &str, calories: f64, protein: f64, category: &str, tags: &[&str]) -> FoodItem {
        FoodItem::from_record(FoodRecord {
            id: Some(FoodId::from(id)),
            name: Some(format!("Food {}", id)),
            calories: Some(calories),
            protein: Some(protein),
            category: Some(category.to_string()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        })
        .unwrap()
    }

    fn priced(mut item: FoodItem, price: f64) -> FoodItem {
        item.price = price;
        item
    }

    fn profile(allergies: &[&str], per_meal: f64) -> UserProfile {
        UserProfile {
            gender: Gender::Female,
            age: 30.0,
            height_cm: 165.0,
            weight_kg: 58.0,
            body_fat_percent: None,
            goal: Goal::Maintenance,
            activity_level: ActivityLevel::Medium,
            meal_count: MealCount::Three,
            budget: Budget::new(per_meal, BudgetPeriod::PerMeal),
            allergies: allergies.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn slot_ids(outcome: &FilterOutcome<'_>, slot: MealSlot) -> Vec<String> {
        ids(&outcome.buckets[&slot])
    }

    /// Two breakfast and two lunch foods, one of each tagged milk.
    fn dairy_menu() -> Vec<FoodItem> {
        vec![
            food("1", 150.0, 8.0, "dairy", &["breakfast", "milk"]),
            food("2", 200.0, 6.0, "carb", &["breakfast"]),
            food("3", 300.0, 10.0, "soup", &["lunch", "milk"]),
            food("4", 350.0, 7.0, "carb", &["lunch"]),
        ]
    }

    fn ids(bucket: &[&FoodItem]) -> Vec<String> {
        bucket.iter().map(|f| f.id.to_string()).collect()
    }

    #[test]
    fn test_slot_rules() {
        let config = SlotConfig::default();
        let yogurt = food("1", 350.0, 10.0, "dairy", &[]);
        let soup = food("2", 150.0, 5.0, "soup", &[]);
        let steak = food("3", 600.0, 40.0, "meat", &[]);
        let tagged = food("4", 900.0, 5.0, "other", &["breakfast"]);

        assert!(qualifies_for(&yogurt, MealSlot::Breakfast, &config));
        assert!(qualifies_for(&yogurt, MealSlot::Lunch, &config));
        assert!(!qualifies_for(&yogurt, MealSlot::Dinner, &config));

        assert!(qualifies_for(&soup, MealSlot::Lunch, &config));
        assert!(qualifies_for(&soup, MealSlot::Breakfast, &config));

        assert!(qualifies_for(&steak, MealSlot::Dinner, &config));
        assert!(!qualifies_for(&steak, MealSlot::Lunch, &config));

        assert!(qualifies_for(&tagged, MealSlot::Breakfast, &config));
    }

    #[test]
    fn test_lunch_window_inclusive() {
        let config = SlotConfig::default();
        assert!(qualifies_for(&food("1", 250.0, 0.0, "other", &[]), MealSlot::Lunch, &config));
        assert!(qualifies_for(&food("2", 500.0, 0.0, "other", &[]), MealSlot::Lunch, &config));
        assert!(!qualifies_for(&food("3", 501.0, 0.0, "other", &[]), MealSlot::Lunch, &config));
    }

    #[test]
    fn test_allergy_substring_match() {
        let omelette = food("1", 220.0, 22.0, "protein", &["egg-dish", "breakfast"]);
        let allergies = vec!["egg".to_string()];
        assert!(matches_allergy_tag(&omelette, &allergies));
        assert!(!matches_allergy_tag(&omelette, &["milk".to_string()]));
    }

    #[test]
    fn test_badge_checks_name() {
        let mut shake = food("1", 200.0, 25.0, "dairy", &[]);
        shake.name = "Milk Shake".to_string();
        assert!(!matches_allergy_tag(&shake, &["milk".to_string()]));
        assert!(allergy_badge(&shake, &["milk".to_string()]));
    }

    #[test]
    fn test_rank_weight_loss_stable() {
        let a = food("a", 300.0, 5.0, "carb", &[]);
        let b = food("b", 200.0, 20.0, "protein", &[]);
        let c = food("c", 100.0, 1.0, "fruit", &[]);
        let d = food("d", 200.0, 30.0, "protein", &[]);
        let mut bucket = vec![&a, &b, &c, &d];
        rank_bucket(&mut bucket, Goal::WeightLoss);
        assert_eq!(ids(&bucket), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_rank_muscle_gain() {
        let a = food("a", 300.0, 50.0, "carb", &[]);
        let b = food("b", 200.0, 20.0, "protein", &[]);
        let c = food("c", 100.0, 35.0, "protein", &[]);
        let mut bucket = vec![&a, &b, &c];
        rank_bucket(&mut bucket, Goal::MuscleGain);
        assert_eq!(ids(&bucket), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_empty_slots_reported() {
        let foods = vec![food("1", 100.0, 0.0, "fruit", &[])];
        let buckets = build_meal_buckets(
            &foods,
            &[MealSlot::Breakfast, MealSlot::Dinner],
            &SlotConfig::default(),
        );
        let outcome = FilterOutcome {
            buckets,
            fallback: false,
            budget_relaxed: false,
        };
        assert_eq!(
            outcome.empty_slots(&[MealSlot::Breakfast, MealSlot::Dinner]),
            vec![MealSlot::Dinner]
        );
    }

    #[test]
    fn test_fallback_keeps_every_bucket_unfiltered() {
        let mut foods = dairy_menu();
        foods.push(food("5", 700.0, 20.0, "other", &["dinner", "milk"]));

        let outcome = recommend_buckets(&foods, &profile(&["milk"], 10000.0), &EngineConfig::default());

        assert!(outcome.fallback);
        assert_eq!(slot_ids(&outcome, MealSlot::Breakfast), vec!["1", "2"]);
        assert_eq!(slot_ids(&outcome, MealSlot::Lunch), vec!["3", "4"]);
        assert_eq!(slot_ids(&outcome, MealSlot::Dinner), vec!["5"]);
    }

    #[test]
    fn test_already_empty_slot_does_not_trigger_fallback() {
        let foods = dairy_menu();
        let outcome = recommend_buckets(&foods, &profile(&["milk"], 10000.0), &EngineConfig::default());

        assert!(!outcome.fallback);
        assert_eq!(slot_ids(&outcome, MealSlot::Breakfast), vec!["2"]);
        assert_eq!(slot_ids(&outcome, MealSlot::Lunch), vec!["4"]);
        let slots = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];
        assert_eq!(outcome.empty_slots(&slots), vec![MealSlot::Dinner]);
    }

    #[test]
    fn test_budget_prefilter_relaxed_when_a_slot_empties() {
        let foods = vec![
            priced(food("1", 150.0, 5.0, "fruit", &[]), 1000.0),
            priced(food("2", 200.0, 6.0, "carb", &["breakfast"]), 9000.0),
            priced(food("3", 300.0, 10.0, "other", &[]), 2000.0),
            priced(food("4", 700.0, 40.0, "meat", &[]), 9000.0),
            priced(food("5", 800.0, 35.0, "other", &["dinner"]), 12000.0),
        ];
        let config = EngineConfig {
            budget_prefilter: true,
            ..Default::default()
        };

        let outcome = recommend_buckets(&foods, &profile(&[], 5000.0), &config);

        assert!(outcome.budget_relaxed);
        assert!(!outcome.fallback);
        assert_eq!(slot_ids(&outcome, MealSlot::Dinner), vec!["4", "5"]);
        assert_eq!(slot_ids(&outcome, MealSlot::Breakfast), vec!["1", "2"]);
    }
}
