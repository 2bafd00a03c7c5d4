use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{PlannerError, ProfileErrors, Result};
use crate::models::plan::MealSlot;
use crate::planner::constants::DAYS_PER_WEEK;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "weight-loss")]
    WeightLoss,
    #[serde(rename = "weight-maintenance", alias = "maintenance")]
    Maintenance,
    #[serde(rename = "muscle-gain")]
    MuscleGain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    #[serde(alias = "sedentary")]
    Low,
    #[default]
    Medium,
    High,
}

/// Number of meals per day; decides which slots a plan has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MealCount {
    Two,
    #[default]
    Three,
}

impl MealCount {
    /// Slot layout, in positional order. Index `i` of a recommendation's
    /// `meals` belongs to `slots()[i]`.
    pub fn slots(&self) -> &'static [MealSlot] {
        match self {
            MealCount::Two => &[MealSlot::Lunch, MealSlot::Dinner],
            MealCount::Three => &[MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner],
        }
    }

    pub fn per_day(&self) -> usize {
        self.slots().len()
    }
}

impl TryFrom<u8> for MealCount {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            2 => Ok(MealCount::Two),
            3 => Ok(MealCount::Three),
            other => Err(format!("meal count must be 2 or 3, got {}", other)),
        }
    }
}

impl From<MealCount> for u8 {
    fn from(value: MealCount) -> Self {
        value.per_day() as u8
    }
}

/// The span of time a budget amount covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetPeriod {
    #[default]
    PerMeal,
    Daily,
    Weekly,
}

/// A budget amount tagged with the period it was entered for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Budget {
    #[serde(rename = "budget")]
    pub amount: f64,
    #[serde(rename = "budgetPeriod")]
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn new(amount: f64, period: BudgetPeriod) -> Self {
        Self { amount, period }
    }

    /// Express this budget over another period.
    ///
    /// The only place budget units are converted; a week is seven days and a
    /// day holds `meals_per_day` meals.
    pub fn amount_for(&self, period: BudgetPeriod, meals_per_day: usize) -> f64 {
        if period == self.period {
            return self.amount;
        }
        let meals = meals_per_day.max(1) as f64;
        let days = DAYS_PER_WEEK as f64;

        let daily = match self.period {
            BudgetPeriod::PerMeal => self.amount * meals,
            BudgetPeriod::Daily => self.amount,
            BudgetPeriod::Weekly => self.amount / days,
        };

        match period {
            BudgetPeriod::PerMeal => daily / meals,
            BudgetPeriod::Daily => daily,
            BudgetPeriod::Weekly => daily * days,
        }
    }
}

/// Profile fields exactly as entered in the form. Everything is optional so
/// that validation can report every problem at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProfile {
    pub gender: Option<String>,
    pub age: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub goal: Option<String>,
    pub activity_level: Option<String>,
    pub meal_count: Option<u8>,
    pub budget: Option<f64>,
    pub budget_period: Option<String>,
    pub allergies: Vec<String>,
}

/// Canonical profile consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub gender: Gender,
    pub age: f64,
    #[serde(rename = "height")]
    pub height_cm: f64,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub meal_count: MealCount,
    #[serde(flatten)]
    pub budget: Budget,
    /// Lowercased, trimmed, deduplicated.
    pub allergies: Vec<String>,
}

impl UserProfile {
    pub fn slots(&self) -> &'static [MealSlot] {
        self.meal_count.slots()
    }

    pub fn meals_per_day(&self) -> usize {
        self.meal_count.per_day()
    }

    /// Budget expressed over `period`.
    pub fn budget_for(&self, period: BudgetPeriod) -> f64 {
        self.budget.amount_for(period, self.meals_per_day())
    }
}

/// Parse an enum-like form value the same way serde would.
fn parse_choice<T: for<'de> Deserialize<'de>>(value: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase())).ok()
}

/// Check a required numeric field against its configured bounds.
fn check_bounded(
    errors: &mut ProfileErrors,
    field: &'static str,
    value: Option<f64>,
    (min, max): (f64, f64),
) -> f64 {
    match value {
        None => {
            errors.push(field, "is required");
            0.0
        }
        Some(v) if !v.is_finite() || v <= 0.0 => {
            errors.push(field, format!("must be a positive number, got {}", v));
            0.0
        }
        Some(v) if v < min || v > max => {
            errors.push(field, format!("must be between {} and {}, got {}", min, max, v));
            v
        }
        Some(v) => v,
    }
}

/// Normalize raw form input into a `UserProfile`.
///
/// Defaults: activity level medium, goal maintenance, three meals, the
/// configured default budget per meal, no allergies. Any missing, non-positive
/// or out-of-bounds required field fails with `InvalidProfile` listing every
/// offending field.
pub fn normalize_profile(raw: &RawProfile, config: &EngineConfig) -> Result<UserProfile> {
    let mut errors = ProfileErrors::default();
    let bounds = &config.bounds;

    let gender = match raw.gender.as_deref() {
        None => {
            errors.push("gender", "is required");
            None
        }
        Some(g) => {
            let parsed = parse_choice::<Gender>(g);
            if parsed.is_none() {
                errors.push("gender", format!("must be male or female, got '{}'", g));
            }
            parsed
        }
    };

    let age = check_bounded(&mut errors, "age", raw.age, bounds.age);
    let height_cm = check_bounded(&mut errors, "height", raw.height, bounds.height_cm);
    let weight_kg = check_bounded(&mut errors, "weight", raw.weight, bounds.weight_kg);

    let body_fat_percent = raw.body_fat_percent.map(|bf| {
        check_bounded(
            &mut errors,
            "bodyFatPercent",
            Some(bf),
            bounds.body_fat_percent,
        )
    });

    let goal = match raw.goal.as_deref() {
        None => Goal::Maintenance,
        Some(g) => parse_choice::<Goal>(g).unwrap_or_else(|| {
            errors.push(
                "goal",
                format!(
                    "must be weight-loss, weight-maintenance or muscle-gain, got '{}'",
                    g
                ),
            );
            Goal::Maintenance
        }),
    };

    let activity_level = match raw.activity_level.as_deref() {
        None => ActivityLevel::default(),
        Some(a) => parse_choice::<ActivityLevel>(a).unwrap_or_else(|| {
            errors.push(
                "activityLevel",
                format!("must be low, medium or high, got '{}'", a),
            );
            ActivityLevel::default()
        }),
    };

    let meal_count = match raw.meal_count {
        None => MealCount::default(),
        Some(n) => MealCount::try_from(n).unwrap_or_else(|reason| {
            errors.push("mealCount", reason);
            MealCount::default()
        }),
    };

    let amount = match raw.budget {
        None => config.default_budget,
        Some(b) if !b.is_finite() || b <= 0.0 => {
            errors.push("budget", format!("must be a positive number, got {}", b));
            0.0
        }
        Some(b) => b,
    };

    let period = match raw.budget_period.as_deref() {
        None => BudgetPeriod::default(),
        Some(p) => parse_choice::<BudgetPeriod>(p).unwrap_or_else(|| {
            errors.push(
                "budgetPeriod",
                format!("must be per-meal, daily or weekly, got '{}'", p),
            );
            BudgetPeriod::default()
        }),
    };

    let mut allergies: Vec<String> = Vec::new();
    for allergy in &raw.allergies {
        let allergy = allergy.trim().to_lowercase();
        if !allergy.is_empty() && !allergies.contains(&allergy) {
            allergies.push(allergy);
        }
    }

    let gender = match gender {
        Some(g) if errors.is_empty() => g,
        _ => {
            debug!(fields = ?errors.fields(), "rejected profile");
            return Err(PlannerError::InvalidProfile(errors));
        }
    };

    Ok(UserProfile {
        gender,
        age,
        height_cm,
        weight_kg,
        body_fat_percent,
        goal,
        activity_level,
        meal_count,
        budget: Budget::new(amount, period),
        allergies,
    })
}
