use std::path::Path;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use meal_planner::cli::{Cli, Command, PlanAction};
use meal_planner::config::EngineConfig;
use meal_planner::error::{PlannerError, Result};
use meal_planner::interface::{
    collect_profile, display_plan, display_recommendation, display_summary, display_targets,
    display_week, prompt_yes_no, resolve_food,
};
use meal_planner::models::{normalize_profile, FoodId, MealPlan, MealSlot, UserProfile};
use meal_planner::planner::{aggregate, compute_targets, project};
use meal_planner::source::{recommend_with_fallback, HttpSource, LocalSource, RecommendationSource};
use meal_planner::state::{
    load_catalog, load_plan, load_profile, save_plan, save_profile, write_week_csv, Catalog,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = EngineConfig::load(cli.config.as_deref())?;
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Profile => cmd_profile(&cli.profile, &config),
        Command::Targets => cmd_targets(&cli.profile, &config),
        Command::Recommend { remote, json } => {
            cmd_recommend(&cli.catalog, &cli.profile, &config, remote.as_deref(), json)
        }
        Command::Plan { action } => {
            cmd_plan(&cli.catalog, &cli.profile, &cli.plan, &config, action)
        }
        Command::Summary { json } => {
            cmd_summary(&cli.catalog, &cli.profile, &cli.plan, &config, json)
        }
        Command::Week { seed, csv } => cmd_week(
            &cli.catalog,
            &cli.profile,
            &cli.plan,
            &config,
            seed,
            csv.as_deref(),
        ),
    }
}

/// Load and validate the saved profile.
fn read_profile(path: &Path, config: &EngineConfig) -> Result<UserProfile> {
    if !path.exists() {
        return Err(PlannerError::InvalidInput(format!(
            "profile not found: {} (run 'profile' first)",
            path.display()
        )));
    }
    normalize_profile(&load_profile(path)?, config)
}

/// The saved plan, or an empty one shaped by the profile's meal count.
///
/// A plan saved for a different meal count is discarded.
fn read_plan(path: &Path, profile: &UserProfile) -> Result<MealPlan> {
    match load_plan(path)? {
        Some(plan) if plan.meal_count() == profile.meal_count => Ok(plan),
        Some(_) => {
            println!("Meal count changed since the plan was saved; starting a new plan.");
            Ok(MealPlan::new(profile.meal_count))
        }
        None => Ok(MealPlan::new(profile.meal_count)),
    }
}

/// Enter the profile interactively and save it once it validates.
fn cmd_profile(path: &Path, config: &EngineConfig) -> Result<()> {
    let existing = if path.exists() {
        Some(load_profile(path)?)
    } else {
        None
    };

    let raw = collect_profile(existing.as_ref())?;

    match normalize_profile(&raw, config) {
        Ok(profile) => {
            save_profile(path, &raw)?;
            println!("Profile saved to {}.", path.display());
            display_targets(&profile, &compute_targets(&profile, &config.targets));
            Ok(())
        }
        Err(PlannerError::InvalidProfile(errors)) => {
            println!("Profile not saved. Please fix:");
            for error in &errors.0 {
                println!("  {}: {}", error.field, error.reason);
            }
            Err(PlannerError::InvalidProfile(errors))
        }
        Err(e) => Err(e),
    }
}

fn cmd_targets(profile_path: &Path, config: &EngineConfig) -> Result<()> {
    let profile = read_profile(profile_path, config)?;
    display_targets(&profile, &compute_targets(&profile, &config.targets));
    Ok(())
}

fn cmd_recommend(
    catalog_path: &Path,
    profile_path: &Path,
    config: &EngineConfig,
    remote: Option<&str>,
    json: bool,
) -> Result<()> {
    let profile = read_profile(profile_path, config)?;
    let catalog = load_catalog(catalog_path)?;
    let local = LocalSource::new(&catalog, config);

    let http = remote.map(|url| HttpSource::new(url, config)).transpose()?;
    let remote_source = http.as_ref().map(|h| h as &dyn RecommendationSource);

    let recommendation = recommend_with_fallback(remote_source, &local, &profile);

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        display_recommendation(&recommendation, &profile);
    }
    Ok(())
}

/// Turn a typed reference into a catalog id, asking when it is ambiguous.
fn pick_food(catalog: &Catalog, reference: &str) -> Result<Option<FoodId>> {
    if catalog.is_empty() {
        return Err(PlannerError::EmptyCatalog);
    }
    Ok(resolve_food(catalog, reference)?.map(|food| food.id.clone()))
}

fn cmd_plan(
    catalog_path: &Path,
    profile_path: &Path,
    plan_path: &Path,
    config: &EngineConfig,
    action: PlanAction,
) -> Result<()> {
    let profile = read_profile(profile_path, config)?;
    let catalog = load_catalog(catalog_path)?;
    let mut plan = read_plan(plan_path, &profile)?;

    let changed = match action {
        PlanAction::Add { slot, food } => add_to_plan(&mut plan, &catalog, slot, &food)?,
        PlanAction::Remove { slot, food } => {
            let id = catalog
                .lookup(&food)
                .map(|f| f.id.clone())
                .unwrap_or_else(|| FoodId::from(food.trim()));
            let removed = plan.remove(slot, &id)?;
            if !removed {
                println!("'{}' is not in {}.", food, slot);
            }
            removed
        }
        PlanAction::Clear { slot: Some(slot) } => {
            plan.clear_slot(slot)?;
            true
        }
        PlanAction::Clear { slot: None } => {
            if !plan.is_empty() && !prompt_yes_no("Clear the whole plan?", false)? {
                return Ok(());
            }
            plan.clear();
            true
        }
        PlanAction::Show => false,
    };

    if changed {
        save_plan(plan_path, &plan)?;
        info!(path = %plan_path.display(), foods = plan.len(), "plan saved");
    }

    display_plan(&plan, &catalog, &profile);

    let summary = aggregate(&plan, &catalog, &profile, config);
    if !plan.is_empty() {
        display_summary(&summary);
    }
    Ok(())
}

fn add_to_plan(plan: &mut MealPlan, catalog: &Catalog, slot: MealSlot, reference: &str) -> Result<bool> {
    let Some(id) = pick_food(catalog, reference)? else {
        println!("Nothing added.");
        return Ok(false);
    };

    let previous = plan.slot_of(&id);
    let added = plan.add(slot, id.clone())?;
    match previous {
        Some(prev) if prev != slot => println!("Moved {} from {} to {}.", id, prev, slot),
        Some(_) => println!("{} is already in {}.", id, slot),
        None => println!("Added {} to {}.", id, slot),
    }
    Ok(added)
}

fn cmd_summary(
    catalog_path: &Path,
    profile_path: &Path,
    plan_path: &Path,
    config: &EngineConfig,
    json: bool,
) -> Result<()> {
    let profile = read_profile(profile_path, config)?;
    let catalog = load_catalog(catalog_path)?;
    let plan = read_plan(plan_path, &profile)?;

    let summary = aggregate(&plan, &catalog, &profile, config);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        display_summary(&summary);
    }
    Ok(())
}

fn cmd_week(
    catalog_path: &Path,
    profile_path: &Path,
    plan_path: &Path,
    config: &EngineConfig,
    seed: Option<u64>,
    csv: Option<&Path>,
) -> Result<()> {
    let profile = read_profile(profile_path, config)?;
    let catalog = load_catalog(catalog_path)?;
    let plan = read_plan(plan_path, &profile)?;

    let summary = aggregate(&plan, &catalog, &profile, config);
    if !summary.validation.is_ready_for_summary {
        display_summary(&summary);
        let proceed = prompt_yes_no("The plan has open issues. Project the week anyway?", false)?;
        if !proceed {
            return Ok(());
        }
    }

    let week = match seed {
        Some(seed) => project(&plan, &catalog, &profile, config, &mut StdRng::seed_from_u64(seed))?,
        None => project(&plan, &catalog, &profile, config, &mut rand::thread_rng())?,
    };

    display_week(&week);

    if let Some(path) = csv {
        write_week_csv(&week, path)?;
        println!("Weekly plan written to {}.", path.display());
    }
    Ok(())
}
