use crate::config::TargetConfig;
use crate::models::{ActivityLevel, BudgetPeriod, Gender, Goal, NutritionTargets, UserProfile};
use crate::planner::constants::*;

/// Basal metabolic rate, Mifflin-St Jeor form.
pub fn calculate_bmr(gender: Gender, weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    let offset = match gender {
        Gender::Male => BMR_MALE_OFFSET,
        Gender::Female => BMR_FEMALE_OFFSET,
    };
    BMR_WEIGHT_COEF * weight_kg + BMR_HEIGHT_COEF * height_cm - BMR_AGE_COEF * age + offset
}

pub fn activity_multiplier(level: ActivityLevel, config: &TargetConfig) -> f64 {
    match level {
        ActivityLevel::Low => config.activity_low,
        ActivityLevel::Medium => config.activity_medium,
        ActivityLevel::High => config.activity_high,
    }
}

/// Total daily energy expenditure: BMR scaled by activity.
pub fn calculate_tdee(profile: &UserProfile, config: &TargetConfig) -> f64 {
    let bmr = calculate_bmr(
        profile.gender,
        profile.weight_kg,
        profile.height_cm,
        profile.age,
    );
    bmr * activity_multiplier(profile.activity_level, config)
}

/// Daily calorie change applied on top of TDEE.
pub fn goal_adjustment(goal: Goal, config: &TargetConfig) -> f64 {
    match goal {
        Goal::WeightLoss => config.weight_loss_adjustment,
        Goal::Maintenance => config.maintenance_adjustment,
        Goal::MuscleGain => config.muscle_gain_adjustment,
    }
}

/// Protein grams per kg of body weight for a goal.
pub fn protein_coefficient(goal: Goal, config: &TargetConfig) -> f64 {
    match goal {
        Goal::MuscleGain => config.protein_per_kg_muscle_gain,
        Goal::WeightLoss | Goal::Maintenance => config.protein_per_kg_default,
    }
}

/// Derive daily calorie and macro targets plus the per-meal budget.
///
/// Pure in the profile; no rounding is applied here.
pub fn compute_targets(profile: &UserProfile, config: &TargetConfig) -> NutritionTargets {
    let calories = calculate_tdee(profile, config) + goal_adjustment(profile.goal, config);
    let protein = profile.weight_kg * protein_coefficient(profile.goal, config);
    let fat = calories * config.fat_calorie_share / KCAL_PER_GRAM_FAT;
    let carbs = calories * config.carb_calorie_share / KCAL_PER_GRAM_CARB;

    NutritionTargets {
        calories,
        protein,
        fat,
        carbs,
        budget: profile.budget_for(BudgetPeriod::PerMeal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, MealCount};

    fn profile(gender: Gender, goal: Goal, activity: ActivityLevel) -> UserProfile {
        UserProfile {
            gender,
            age: 30.0,
            height_cm: 175.0,
            weight_kg: 70.0,
            body_fat_percent: None,
            goal,
            activity_level: activity,
            meal_count: MealCount::Three,
            budget: Budget::new(21000.0, BudgetPeriod::Daily),
            allergies: Vec::new(),
        }
    }

    #[test]
    fn test_bmr_gender_offset() {
        let male = calculate_bmr(Gender::Male, 70.0, 175.0, 30.0);
        let female = calculate_bmr(Gender::Female, 70.0, 175.0, 30.0);
        assert!((male - 1648.75).abs() < 1e-9);
        assert!((male - female - 166.0).abs() < 1e-9);
    }

    #[test]
    fn test_activity_multipliers() {
        let config = TargetConfig::default();
        let low = calculate_tdee(&profile(Gender::Male, Goal::Maintenance, ActivityLevel::Low), &config);
        let high = calculate_tdee(&profile(Gender::Male, Goal::Maintenance, ActivityLevel::High), &config);
        assert!((low - 1648.75 * 1.2).abs() < 1e-9);
        assert!((high - 1648.75 * 1.725).abs() < 1e-9);
    }

    #[test]
    fn test_maintenance_has_no_adjustment() {
        let config = TargetConfig::default();
        let p = profile(Gender::Female, Goal::Maintenance, ActivityLevel::Medium);
        let targets = compute_targets(&p, &config);
        assert!((targets.calories - calculate_tdee(&p, &config)).abs() < 1e-9);
        assert!((targets.protein - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_macro_shares() {
        let config = TargetConfig::default();
        let targets = compute_targets(
            &profile(Gender::Male, Goal::MuscleGain, ActivityLevel::Medium),
            &config,
        );
        assert!((targets.protein - 140.0).abs() < 1e-9);
        assert!((targets.fat - targets.calories * 0.3 / 9.0).abs() < 1e-9);
        assert!((targets.carbs - targets.calories * 0.5 / 4.0).abs() < 1e-9);
        assert!((targets.budget - 7000.0).abs() < 1e-9);
    }
}
