use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::models::{FoodItem, MealSlot, NutritionSummary, UserProfile};
use crate::planner::filter::{recommend_buckets, FilterOutcome};
use crate::planner::summary::summarize;
use crate::state::Catalog;

/// Where a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Local,
    Remote,
}

/// Response to a recommendation request.
///
/// `meals[i]` holds the candidates for `slots[i]`; the layout comes from the
/// profile's meal count (`[breakfast, lunch, dinner]` or `[lunch, dinner]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub slots: Vec<MealSlot>,
    pub meals: Vec<Vec<FoodItem>>,
    pub summary: NutritionSummary,
    /// Allergy filtering was dropped so no slot would be empty.
    pub fallback: bool,
    pub budget_relaxed: bool,
    /// Slots with no candidates even after fallback.
    pub empty_slots: Vec<MealSlot>,
    pub source: SourceKind,
}

impl Recommendation {
    pub fn candidates(&self, slot: MealSlot) -> &[FoodItem] {
        self.slots
            .iter()
            .position(|s| *s == slot)
            .map(|idx| self.meals[idx].as_slice())
            .unwrap_or(&[])
    }

    /// No slot has anything to offer.
    pub fn is_empty(&self) -> bool {
        self.meals.iter().all(Vec::is_empty)
    }
}

/// Top candidate of each slot, never repeating a food across slots.
pub fn sample_selection<'a>(
    slots: &[MealSlot],
    buckets: &[Vec<&'a FoodItem>],
) -> BTreeMap<MealSlot, Vec<&'a FoodItem>> {
    let mut used = HashSet::new();
    slots
        .iter()
        .zip(buckets)
        .map(|(slot, bucket)| {
            let pick = bucket.iter().copied().find(|food| used.insert(&food.id));
            (*slot, pick.into_iter().collect())
        })
        .collect()
}

/// Build a recommendation from filter output.
pub fn assemble(
    outcome: &FilterOutcome<'_>,
    profile: &UserProfile,
    config: &EngineConfig,
    source: SourceKind,
) -> Recommendation {
    let slots = profile.slots();
    let ordered = outcome.in_order(slots);
    let sample = sample_selection(slots, &ordered);
    let summary = summarize(&sample, profile, config).summary;
    let empty_slots = outcome.empty_slots(slots);

    if !empty_slots.is_empty() {
        warn!(?empty_slots, "no recommendations for some slots");
    }

    Recommendation {
        slots: slots.to_vec(),
        meals: ordered
            .iter()
            .map(|bucket| bucket.iter().map(|f| (*f).clone()).collect())
            .collect(),
        summary,
        fallback: outcome.fallback,
        budget_relaxed: outcome.budget_relaxed,
        empty_slots,
        source,
    }
}

/// Run the local filter over the catalog.
pub fn recommend_local(
    catalog: &Catalog,
    profile: &UserProfile,
    config: &EngineConfig,
) -> Recommendation {
    let outcome = recommend_buckets(catalog.as_slice(), profile, config);
    let recommendation = assemble(&outcome, profile, config, SourceKind::Local);
    info!(
        fallback = recommendation.fallback,
        candidates = recommendation.meals.iter().map(Vec::len).sum::<usize>(),
        "local recommendation ready"
    );
    recommendation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodId, FoodRecord, RawProfile, normalize_profile};

    fn food(id: &str, calories: f64, tags: &[&str]) -> FoodItem {
        FoodItem::from_record(FoodRecord {
            id: Some(FoodId::from(id)),
            name: Some(format!("Food {}", id)),
            calories: Some(calories),
            price: Some(1000.0),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        })
        .unwrap()
    }

    fn profile(meal_count: u8) -> UserProfile {
        normalize_profile(
            &RawProfile {
                gender: Some("female".to_string()),
                age: Some(40.0),
                height: Some(160.0),
                weight: Some(55.0),
                meal_count: Some(meal_count),
                ..Default::default()
            },
            &EngineConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_sample_selection_distinct() {
        let a = food("a", 350.0, &[]);
        let b = food("b", 450.0, &[]);
        let buckets = vec![vec![&a, &b], vec![&a, &b]];
        let sample = sample_selection(&[MealSlot::Lunch, MealSlot::Dinner], &buckets);
        assert_eq!(sample[&MealSlot::Lunch][0].id, FoodId::from("a"));
        assert_eq!(sample[&MealSlot::Dinner][0].id, FoodId::from("b"));
    }

    #[test]
    fn test_two_meal_layout() {
        let catalog = Catalog::new(vec![food("1", 100.0, &[]), food("2", 450.0, &[])]);
        let rec = recommend_local(&catalog, &profile(2), &EngineConfig::default());

        assert_eq!(rec.slots, vec![MealSlot::Lunch, MealSlot::Dinner]);
        assert_eq!(rec.meals.len(), 2);
        assert!(rec.candidates(MealSlot::Breakfast).is_empty());
        assert_eq!(rec.candidates(MealSlot::Dinner)[0].id, FoodId::from("2"));
    }

    #[test]
    fn test_empty_catalog_is_empty_result() {
        let rec = recommend_local(&Catalog::default(), &profile(3), &EngineConfig::default());
        assert!(rec.is_empty());
        assert_eq!(rec.empty_slots.len(), 3);
        assert!(!rec.fallback);
    }
}
