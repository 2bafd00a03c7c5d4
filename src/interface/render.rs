use crate::models::{FoodItem, MealPlan, NutritionSummary, NutritionTargets, TargetActual, UserProfile};
use crate::planner::filter::allergy_badge;
use crate::planner::{PlanSummary, Recommendation, SourceKind, WeeklyProjection};
use crate::state::Catalog;

/// Display daily targets for a profile.
pub fn display_targets(profile: &UserProfile, targets: &NutritionTargets) {
    println!();
    println!("=== Daily Targets ===");
    println!();
    println!("Calories: {:>7.0} kcal", targets.calories);
    println!("Protein:  {:>7.1} g", targets.protein);
    println!("Fat:      {:>7.1} g", targets.fat);
    println!("Carbs:    {:>7.1} g", targets.carbs);
    println!(
        "Budget:   {:>7.0} per meal ({} meals/day)",
        targets.budget,
        profile.meals_per_day()
    );
    println!();
}

fn food_line(food: &FoodItem, allergies: &[String], width: usize) -> String {
    let badge = if allergy_badge(food, allergies) {
        "  [Allergy!]"
    } else {
        ""
    };
    format!(
        "{:<width$} - {:>4} kcal | P:{:.0} F:{:.0} C:{:.0} | {:.0}{}",
        food.name,
        food.calories,
        food.protein,
        food.fat,
        food.carbs,
        food.price,
        badge,
        width = width
    )
}

fn pair_line(label: &str, pair: &TargetActual, unit: &str) -> String {
    format!(
        "{:<9} {:>7.0} / {:>7.0} {:<4} ({:.0}%)",
        label,
        pair.actual,
        pair.target,
        unit,
        pair.percent()
    )
}

fn display_nutrition(summary: &NutritionSummary) {
    println!("{}", pair_line("Calories", &summary.calories, "kcal"));
    println!("{}", pair_line("Protein", &summary.protein, "g"));
    println!("{}", pair_line("Fat", &summary.fat, "g"));
    println!("{}", pair_line("Carbs", &summary.carbs, "g"));
    println!("{}", pair_line("Budget", &summary.budget, "/meal"));
    if summary.allergy {
        println!("Warning: the selection contains foods matching your allergies.");
    }
}

/// Display recommendation candidates per slot.
pub fn display_recommendation(rec: &Recommendation, profile: &UserProfile) {
    if rec.is_empty() {
        println!("No recommendations available (empty catalog or no suitable foods).");
        return;
    }

    println!();
    println!("=== Recommendations ===");
    if rec.source == SourceKind::Remote {
        println!("(from remote service)");
    }
    if rec.fallback {
        println!("Note: allergy filtering would have left a meal empty, so all foods are shown.");
    }
    if rec.budget_relaxed {
        println!("Note: no affordable option for some meals; the budget filter was ignored.");
    }

    let width = rec
        .meals
        .iter()
        .flatten()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(10);

    for (slot, foods) in rec.slots.iter().zip(&rec.meals) {
        println!();
        println!("--- {} ({}) ---", slot.label(), foods.len());
        if foods.is_empty() {
            println!("  (no suitable foods)");
        }
        for (i, food) in foods.iter().enumerate() {
            println!("{:>3}. {}", i + 1, food_line(food, &profile.allergies, width));
        }
    }

    println!();
    println!("--- Top picks vs. targets ---");
    display_nutrition(&rec.summary);
    println!();
}

/// Display the plan's foods per slot.
pub fn display_plan(plan: &MealPlan, catalog: &Catalog, profile: &UserProfile) {
    if plan.is_empty() {
        println!("The meal plan is empty. Use 'plan add <slot> <food>' to fill it.");
        return;
    }

    println!();
    println!("=== Meal Plan ===");

    for slot in plan.meal_count().slots() {
        println!();
        println!("--- {} ---", slot.label());
        let ids = plan.foods_in(*slot);
        if ids.is_empty() {
            println!("  (empty)");
        }
        for id in ids {
            match catalog.get(id) {
                Some(food) => println!("  {}", food_line(food, &profile.allergies, 24)),
                None => println!("  {} (not in catalog)", id),
            }
        }
    }
    println!();
}

/// Display the aggregate of a plan with its validation flags.
pub fn display_summary(summary: &PlanSummary) {
    println!();
    println!("=== Plan Summary ===");
    println!();
    display_nutrition(&summary.summary);
    println!();
    println!("Daily cost: {:.0}", summary.totals.cost);

    let flags = &summary.validation;
    if flags.budget_exceeded {
        println!("! Daily cost exceeds the budget.");
    }
    if flags.nutrition_mismatch {
        println!("! Macros are outside the target range.");
    }
    if flags.has_allergies {
        println!("! Contains allergens: {:?}", summary.allergy_foods);
    }
    if flags.missing_meals {
        let missing: Vec<&str> = summary.missing_slots.iter().map(|s| s.as_str()).collect();
        println!("! Missing meals: {}", missing.join(", "));
    }
    if flags.is_ready_for_summary {
        println!("Plan is ready for the weekly summary.");
    }
    println!();
}

/// Display a weekly projection.
pub fn display_week(week: &WeeklyProjection) {
    println!();
    println!("=== Weekly Plan ===");

    for day in &week.days {
        println!();
        println!(
            "{} - {:.0} kcal, {:.0}",
            day.day, day.total_calories, day.total_cost
        );
        for (slot, foods) in &day.meals {
            let names: Vec<&str> = foods.iter().map(|f| f.name.as_str()).collect();
            println!("  {:<10} {}", slot.label(), names.join(", "));
        }
    }

    let budget = &week.budget;
    println!();
    println!("--- Budget ---");
    println!("Weekly budget: {:.0}", budget.weekly_budget);
    println!("Actual spend:  {:.0}", budget.actual_spend);
    if budget.savings >= 0.0 {
        println!("Savings:       {:.0}", budget.savings);
    } else {
        println!("Over budget:   {:.0}", -budget.savings);
    }
    for (slot, cost) in &budget.slot_costs {
        let pct = budget.slot_cost_percentages.get(slot).copied().unwrap_or(0.0);
        println!("  {:<10} {:>8.0} ({:.1}%)", slot.label(), cost, pct);
    }

    println!();
    println!(
        "Average calories: {:.0} / {:.0} kcal",
        week.nutrition.average_calories, week.nutrition.calorie_target
    );
    println!();
}
