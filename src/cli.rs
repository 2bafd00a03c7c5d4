use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::MealSlot;

/// Meal planner: nutrition targets, meal recommendations and weekly plans.
#[derive(Parser, Debug)]
#[command(name = "meal_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food catalog (JSON or CSV).
    #[arg(short, long, default_value = "foods.json", global = true)]
    pub catalog: PathBuf,

    /// Path to the saved profile.
    #[arg(short, long, default_value = "profile.json", global = true)]
    pub profile: PathBuf,

    /// Path to the saved meal plan.
    #[arg(long, default_value = "plan.json", global = true)]
    pub plan: PathBuf,

    /// Optional engine configuration JSON.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enter or update the user profile.
    Profile,

    /// Show daily nutrition targets for the saved profile.
    Targets,

    /// Recommend foods for each meal slot.
    Recommend {
        /// Base URL of a remote recommendation service.
        #[arg(long)]
        remote: Option<String>,

        /// Print the recommendation as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Edit the saved meal plan.
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Summarize the meal plan against the profile's targets.
    Summary {
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Project the meal plan across a week.
    Week {
        /// Seed for the per-day shuffle.
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the week to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlanAction {
    /// Add a food (by id or name) to a slot.
    Add { slot: MealSlot, food: String },

    /// Remove a food from a slot.
    Remove { slot: MealSlot, food: String },

    /// Clear one slot, or the whole plan.
    Clear { slot: Option<MealSlot> },

    /// Show the current plan.
    Show,
}

impl Default for Command {
    fn default() -> Self {
        Command::Recommend {
            remote: None,
            json: false,
        }
    }
}
