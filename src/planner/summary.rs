use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::models::{
    BudgetPeriod, FoodId, FoodItem, MealPlan, MealSlot, NutritionSummary, NutritionTotals,
    TargetActual, UserProfile,
};
use crate::planner::filter::matches_allergy_tag;
use crate::planner::targets::compute_targets;
use crate::state::Catalog;

/// Pass/fail flags gating the move from plan editing to the weekly summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStatus {
    /// Daily cost is above the daily allowance derived from the budget.
    pub budget_exceeded: bool,
    /// Protein, fat or carbs fall outside the tolerance around their target.
    pub nutrition_mismatch: bool,
    pub has_allergies: bool,
    pub missing_meals: bool,
    pub is_ready_for_summary: bool,
}

/// Everything derived from one plan: totals, target pairs and flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub totals: NutritionTotals,
    pub slot_totals: BTreeMap<MealSlot, NutritionTotals>,
    pub summary: NutritionSummary,
    pub validation: ValidationStatus,
    pub missing_slots: Vec<MealSlot>,
    /// Selected foods carrying an allergy tag.
    pub allergy_foods: Vec<FoodId>,
}

/// Sum calories, macros and price over foods.
pub fn sum_foods<'a>(foods: impl IntoIterator<Item = &'a FoodItem>) -> NutritionTotals {
    foods
        .into_iter()
        .fold(NutritionTotals::default(), |mut acc, food| {
            acc.calories += f64::from(food.calories);
            acc.protein += food.protein;
            acc.fat += food.fat;
            acc.carbs += food.carbs;
            acc.cost += food.price;
            acc
        })
}

/// Summarize a resolved selection against the profile's targets.
pub fn summarize(
    selection: &BTreeMap<MealSlot, Vec<&FoodItem>>,
    profile: &UserProfile,
    config: &EngineConfig,
) -> PlanSummary {
    let slots = profile.slots();
    let targets = compute_targets(profile, &config.targets);

    let slot_totals: BTreeMap<MealSlot, NutritionTotals> = slots
        .iter()
        .map(|slot| {
            let foods = selection.get(slot).map(Vec::as_slice).unwrap_or(&[]);
            (*slot, sum_foods(foods.iter().copied()))
        })
        .collect();
    let totals = sum_foods(
        slots
            .iter()
            .filter_map(|slot| selection.get(slot))
            .flatten()
            .copied(),
    );

    let missing_slots: Vec<MealSlot> = slots
        .iter()
        .copied()
        .filter(|slot| selection.get(slot).is_none_or(Vec::is_empty))
        .collect();

    let allergy_foods: Vec<FoodId> = slots
        .iter()
        .filter_map(|slot| selection.get(slot))
        .flatten()
        .filter(|food| matches_allergy_tag(food, &profile.allergies))
        .map(|food| food.id.clone())
        .collect();

    let summary = NutritionSummary {
        calories: TargetActual::new(targets.calories, totals.calories),
        protein: TargetActual::new(targets.protein, totals.protein),
        fat: TargetActual::new(targets.fat, totals.fat),
        carbs: TargetActual::new(targets.carbs, totals.carbs),
        budget: TargetActual::new(targets.budget, totals.cost / profile.meals_per_day() as f64),
        allergy: !allergy_foods.is_empty(),
    };

    let tolerance = config.nutrition_tolerance;
    let budget_exceeded = totals.cost > profile.budget_for(BudgetPeriod::Daily);
    let nutrition_mismatch = [summary.protein, summary.fat, summary.carbs]
        .iter()
        .any(|pair| !pair.within(tolerance));
    let has_allergies = summary.allergy;
    let missing_meals = !missing_slots.is_empty();

    let validation = ValidationStatus {
        budget_exceeded,
        nutrition_mismatch,
        has_allergies,
        missing_meals,
        is_ready_for_summary: !missing_meals && !budget_exceeded && !has_allergies,
    };
    debug!(?validation, cost = totals.cost, calories = totals.calories, "plan summarized");

    PlanSummary {
        totals,
        slot_totals,
        summary,
        validation,
        missing_slots,
        allergy_foods,
    }
}

/// Aggregate a plan. Ids missing from the catalog contribute nothing.
///
/// Pure given its inputs; recompute after every plan edit.
pub fn aggregate(
    plan: &MealPlan,
    catalog: &Catalog,
    profile: &UserProfile,
    config: &EngineConfig,
) -> PlanSummary {
    let selection: BTreeMap<MealSlot, Vec<&FoodItem>> = profile
        .slots()
        .iter()
        .map(|slot| {
            let foods = plan
                .foods_in(*slot)
                .iter()
                .filter_map(|id| {
                    let food = catalog.get(id);
                    if food.is_none() {
                        warn!(%id, %slot, "plan references a food missing from the catalog");
                    }
                    food
                })
                .collect();
            (*slot, foods)
        })
        .collect();

    summarize(&selection, profile, config)
}
