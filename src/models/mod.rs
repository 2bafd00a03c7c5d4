pub mod food;
pub mod plan;
pub mod profile;
pub mod summary;

pub use food::{Category, FoodId, FoodItem, FoodRecord};
pub use plan::{MealPlan, MealSlot};
pub use profile::{
    normalize_profile, ActivityLevel, Budget, BudgetPeriod, Gender, Goal, MealCount, RawProfile,
    UserProfile,
};
pub use summary::{NutritionSummary, NutritionTargets, NutritionTotals, TargetActual};
