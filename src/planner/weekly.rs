use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{BudgetPeriod, FoodItem, MealPlan, MealSlot, UserProfile};
use crate::planner::constants::{DAYS_PER_WEEK, DAY_LABELS};
use crate::planner::summary::sum_foods;
use crate::planner::targets::compute_targets;
use crate::state::Catalog;

/// One day of the projected week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanDay {
    pub day: String,
    pub meals: BTreeMap<MealSlot, Vec<FoodItem>>,
    pub total_calories: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetData {
    pub weekly_budget: f64,
    pub actual_spend: f64,
    /// Negative when the week overspends.
    pub savings: f64,
    /// Weekly cost per slot.
    pub slot_costs: BTreeMap<MealSlot, f64>,
    /// Share of the total cost per slot, 0 when nothing costs anything.
    pub slot_cost_percentages: BTreeMap<MealSlot, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyNutrition {
    pub average_calories: f64,
    pub calorie_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyProjection {
    pub days: Vec<WeeklyPlanDay>,
    pub budget: BudgetData,
    pub nutrition: WeeklyNutrition,
}

/// Repeat the day's plan across the week, shuffling the order of each slot
/// independently per day. The foods themselves never change, so every day
/// has the same totals.
///
/// Fails with `FoodNotFound` if the plan references a food missing from the
/// catalog.
pub fn project<R: Rng + ?Sized>(
    plan: &MealPlan,
    catalog: &Catalog,
    profile: &UserProfile,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<WeeklyProjection> {
    let resolved = plan.resolve(catalog)?;
    let selection: BTreeMap<MealSlot, Vec<&FoodItem>> = profile
        .slots()
        .iter()
        .map(|slot| (*slot, resolved.get(slot).cloned().unwrap_or_default()))
        .collect();

    let days: Vec<WeeklyPlanDay> = DAY_LABELS
        .iter()
        .map(|label| {
            let meals: BTreeMap<MealSlot, Vec<FoodItem>> = selection
                .iter()
                .map(|(slot, foods)| {
                    let mut day_foods: Vec<FoodItem> = foods.iter().map(|f| (*f).clone()).collect();
                    day_foods.shuffle(&mut *rng);
                    (*slot, day_foods)
                })
                .collect();
            let totals = sum_foods(meals.values().flatten());

            WeeklyPlanDay {
                day: label.to_string(),
                meals,
                total_calories: totals.calories,
                total_cost: totals.cost,
            }
        })
        .collect();

    let weeks = DAYS_PER_WEEK as f64;
    let slot_costs: BTreeMap<MealSlot, f64> = selection
        .iter()
        .map(|(slot, foods)| (*slot, sum_foods(foods.iter().copied()).cost * weeks))
        .collect();
    let total_cost: f64 = slot_costs.values().sum();
    let slot_cost_percentages = slot_costs
        .iter()
        .map(|(slot, cost)| {
            let pct = if total_cost > 0.0 {
                cost / total_cost * 100.0
            } else {
                0.0
            };
            (*slot, pct)
        })
        .collect();

    let day_totals = sum_foods(selection.values().flatten().copied());
    let weekly_budget = profile.budget_for(BudgetPeriod::Weekly);
    let actual_spend = day_totals.cost * weeks;

    let total_calories: f64 = days.iter().map(|d| d.total_calories).sum();
    let nutrition = WeeklyNutrition {
        average_calories: total_calories / weeks,
        calorie_target: compute_targets(profile, &config.targets).calories,
    };

    debug!(weekly_budget, actual_spend, "projected week");

    Ok(WeeklyProjection {
        days,
        budget: BudgetData {
            weekly_budget,
            actual_spend,
            savings: weekly_budget - actual_spend,
            slot_costs,
            slot_cost_percentages,
        },
        nutrition,
    })
}
