// ─────────────────────────────────────────────────────────────────────────────
// Energy expenditure
// ─────────────────────────────────────────────────────────────────────────────

/// Mifflin-St Jeor BMR offset for men.
pub const BMR_MALE_OFFSET: f64 = 5.0;

/// Mifflin-St Jeor BMR offset for women.
pub const BMR_FEMALE_OFFSET: f64 = -161.0;

/// BMR coefficients: kcal per kg, per cm, per year of age.
pub const BMR_WEIGHT_COEF: f64 = 10.0;
pub const BMR_HEIGHT_COEF: f64 = 6.25;
pub const BMR_AGE_COEF: f64 = 5.0;

/// Activity multipliers applied to BMR.
pub const ACTIVITY_LOW: f64 = 1.2;
pub const ACTIVITY_MEDIUM: f64 = 1.55;
pub const ACTIVITY_HIGH: f64 = 1.725;

/// Daily calorie adjustment per goal (kcal).
pub const WEIGHT_LOSS_ADJUSTMENT: f64 = -500.0;
pub const MAINTENANCE_ADJUSTMENT: f64 = 0.0;
pub const MUSCLE_GAIN_ADJUSTMENT: f64 = 300.0;

// ─────────────────────────────────────────────────────────────────────────────
// Macronutrients
// ─────────────────────────────────────────────────────────────────────────────

/// Protein grams per kg of body weight.
pub const PROTEIN_PER_KG_MUSCLE_GAIN: f64 = 2.0;
pub const PROTEIN_PER_KG_DEFAULT: f64 = 1.5;

/// Share of the calorie target coming from fat and carbs.
pub const FAT_CALORIE_SHARE: f64 = 0.30;
pub const CARB_CALORIE_SHARE: f64 = 0.50;

/// Energy density (kcal per gram).
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
pub const KCAL_PER_GRAM_CARB: f64 = 4.0;

/// Allowed relative deviation of an actual macro from its target.
pub const NUTRITION_TOLERANCE: f64 = 0.20;

// ─────────────────────────────────────────────────────────────────────────────
// Meal slot thresholds (kcal)
// ─────────────────────────────────────────────────────────────────────────────

/// Foods strictly below this qualify for breakfast.
pub const BREAKFAST_MAX_CALORIES: f64 = 300.0;

/// Inclusive calorie window for lunch.
pub const LUNCH_MIN_CALORIES: f64 = 250.0;
pub const LUNCH_MAX_CALORIES: f64 = 500.0;

/// Foods at or above this qualify for dinner.
pub const DINNER_MIN_CALORIES: f64 = 400.0;

// ─────────────────────────────────────────────────────────────────────────────
// Profile bounds and defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const MIN_AGE: f64 = 10.0;
pub const MAX_AGE: f64 = 120.0;
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 250.0;
pub const MIN_BODY_FAT_PERCENT: f64 = 3.0;
pub const MAX_BODY_FAT_PERCENT: f64 = 70.0;

/// Budget used when the form leaves it blank (per meal).
pub const DEFAULT_BUDGET: f64 = 10000.0;

pub const DAYS_PER_WEEK: usize = 7;

/// Day labels for the weekly projection, Monday first.
pub const DAY_LABELS: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Minimum Jaro-Winkler score for a fuzzy food-name match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// Request timeout for a remote recommendation source, in seconds.
pub const REMOTE_TIMEOUT_SECS: u64 = 10;
