pub mod constants;
pub mod filter;
pub mod recommend;
pub mod summary;
pub mod targets;
pub mod weekly;

pub use filter::{
    allergy_badge, apply_allergy_filter, build_meal_buckets, matches_allergy_tag, qualifies_for,
    rank_bucket, recommend_buckets, Buckets, FilterOutcome,
};
pub use recommend::{assemble, recommend_local, sample_selection, Recommendation, SourceKind};
pub use summary::{aggregate, sum_foods, summarize, PlanSummary, ValidationStatus};
pub use targets::{calculate_bmr, calculate_tdee, compute_targets};
pub use weekly::{project, BudgetData, WeeklyNutrition, WeeklyPlanDay, WeeklyProjection};
