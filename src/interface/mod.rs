pub mod prompts;
pub mod render;

pub use prompts::{collect_profile, prompt_yes_no, resolve_food};
pub use render::{
    display_plan, display_recommendation, display_summary, display_targets, display_week,
};
