pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod source;
pub mod state;

pub use config::EngineConfig;
pub use error::{PlannerError, Result};
pub use models::{FoodItem, MealPlan, MealSlot, UserProfile};
