use dialoguer::{Confirm, Input, Select};

use crate::error::{PlannerError, Result};
use crate::models::{FoodItem, RawProfile};
use crate::state::Catalog;

const GENDERS: [&str; 2] = ["male", "female"];
const GOALS: [&str; 3] = ["weight-loss", "weight-maintenance", "muscle-gain"];
const ACTIVITY_LEVELS: [&str; 3] = ["low", "medium", "high"];
const BUDGET_PERIODS: [&str; 3] = ["per-meal", "daily", "weekly"];

/// Ask for a number, keeping the previous answer as the default.
fn prompt_number(prompt: &str, current: Option<f64>) -> Result<f64> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(value) = current {
        input = input.default(value.to_string());
    }
    let text = input.interact_text()?;

    text.trim()
        .parse()
        .map_err(|_| PlannerError::InvalidInput(format!("'{}' is not a number", text.trim())))
}

/// Pick one of `options`, preselecting the previous answer when present.
fn prompt_choice(prompt: &str, options: &[&str], current: Option<&str>) -> Result<String> {
    let default = current
        .and_then(|c| options.iter().position(|o| o.eq_ignore_ascii_case(c)))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()?;

    Ok(options[selection].to_string())
}

/// Walk through every profile field. Validation happens afterwards, so that
/// all problems are reported together.
pub fn collect_profile(existing: Option<&RawProfile>) -> Result<RawProfile> {
    let prev = existing.cloned().unwrap_or_default();

    let gender = prompt_choice("Gender", &GENDERS, prev.gender.as_deref())?;
    let age = prompt_number("Age", prev.age)?;
    let height = prompt_number("Height (cm)", prev.height)?;
    let weight = prompt_number("Weight (kg)", prev.weight)?;

    let body_fat: String = Input::new()
        .with_prompt("Body fat % (optional)")
        .default(prev.body_fat_percent.map(|b| b.to_string()).unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    let body_fat_percent: Option<f64> = match body_fat.trim() {
        "" => None,
        value => Some(value.parse().map_err(|_| {
            PlannerError::InvalidInput(format!("'{}' is not a number", value))
        })?),
    };

    let goal = prompt_choice("Goal", &GOALS, prev.goal.as_deref())?;
    let activity_level =
        prompt_choice("Activity level", &ACTIVITY_LEVELS, prev.activity_level.as_deref())?;

    let meals = Select::new()
        .with_prompt("Meals per day")
        .items(&["3 (breakfast, lunch, dinner)", "2 (lunch, dinner)"])
        .default(if prev.meal_count == Some(2) { 1 } else { 0 })
        .interact()?;
    let meal_count = if meals == 1 { 2 } else { 3 };

    let budget = prompt_number("Budget", prev.budget)?;
    let budget_period =
        prompt_choice("Budget covers", &BUDGET_PERIODS, prev.budget_period.as_deref())?;

    let allergies: String = Input::new()
        .with_prompt("Allergies (comma separated, optional)")
        .default(prev.allergies.join(", "))
        .allow_empty(true)
        .interact_text()?;

    Ok(RawProfile {
        gender: Some(gender),
        age: Some(age),
        height: Some(height),
        weight: Some(weight),
        body_fat_percent,
        goal: Some(goal),
        activity_level: Some(activity_level),
        meal_count: Some(meal_count),
        budget: Some(budget),
        budget_period: Some(budget_period),
        allergies: allergies
            .split(',')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
    })
}

/// Resolve a typed food reference against the catalog.
///
/// Exact id or name wins. Otherwise close names are offered: one match asks
/// for confirmation, several are listed. Returns `None` if the user declines.
pub fn resolve_food<'a>(catalog: &'a Catalog, reference: &str) -> Result<Option<&'a FoodItem>> {
    if let Some(food) = catalog.lookup(reference) {
        return Ok(Some(food));
    }

    let candidates = catalog.fuzzy_matches(reference);

    if candidates.is_empty() {
        return Err(PlannerError::FoodNotFound(reference.to_string()));
    }

    if candidates.len() == 1 {
        let food = candidates[0].0;
        let confirm = prompt_yes_no(&format!("Did you mean '{}'?", food.name), true)?;
        return Ok(confirm.then_some(food));
    }

    let options: Vec<&FoodItem> = candidates.iter().take(5).map(|(f, _)| *f).collect();
    let mut labels: Vec<String> = options.iter().map(|f| f.name.clone()).collect();
    labels.push("None of these".to_string());

    let selection = Select::new()
        .with_prompt("Which did you mean?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(options.get(selection).copied())
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
