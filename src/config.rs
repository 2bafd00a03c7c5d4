use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::planner::constants::*;

/// Constants feeding the target calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub activity_low: f64,
    pub activity_medium: f64,
    pub activity_high: f64,
    pub weight_loss_adjustment: f64,
    pub maintenance_adjustment: f64,
    pub muscle_gain_adjustment: f64,
    pub protein_per_kg_muscle_gain: f64,
    pub protein_per_kg_default: f64,
    pub fat_calorie_share: f64,
    pub carb_calorie_share: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            activity_low: ACTIVITY_LOW,
            activity_medium: ACTIVITY_MEDIUM,
            activity_high: ACTIVITY_HIGH,
            weight_loss_adjustment: WEIGHT_LOSS_ADJUSTMENT,
            maintenance_adjustment: MAINTENANCE_ADJUSTMENT,
            muscle_gain_adjustment: MUSCLE_GAIN_ADJUSTMENT,
            protein_per_kg_muscle_gain: PROTEIN_PER_KG_MUSCLE_GAIN,
            protein_per_kg_default: PROTEIN_PER_KG_DEFAULT,
            fat_calorie_share: FAT_CALORIE_SHARE,
            carb_calorie_share: CARB_CALORIE_SHARE,
        }
    }
}

/// Calorie thresholds used to assign foods to meal slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    pub breakfast_max_calories: f64,
    pub lunch_min_calories: f64,
    pub lunch_max_calories: f64,
    pub dinner_min_calories: f64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            breakfast_max_calories: BREAKFAST_MAX_CALORIES,
            lunch_min_calories: LUNCH_MIN_CALORIES,
            lunch_max_calories: LUNCH_MAX_CALORIES,
            dinner_min_calories: DINNER_MIN_CALORIES,
        }
    }
}

/// Inclusive bounds enforced by the profile normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileBounds {
    pub age: (f64, f64),
    pub height_cm: (f64, f64),
    pub weight_kg: (f64, f64),
    pub body_fat_percent: (f64, f64),
}

impl Default for ProfileBounds {
    fn default() -> Self {
        Self {
            age: (MIN_AGE, MAX_AGE),
            height_cm: (MIN_HEIGHT_CM, MAX_HEIGHT_CM),
            weight_kg: (MIN_WEIGHT_KG, MAX_WEIGHT_KG),
            body_fat_percent: (MIN_BODY_FAT_PERCENT, MAX_BODY_FAT_PERCENT),
        }
    }
}

/// Runtime-configurable engine settings.
///
/// Every field defaults to the values in `planner::constants`, so a config file
/// only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub targets: TargetConfig,
    pub slots: SlotConfig,
    pub bounds: ProfileBounds,
    /// Relative tolerance for the nutrition-mismatch check.
    pub nutrition_tolerance: f64,
    /// Drop foods priced above the per-meal budget before bucketing.
    pub budget_prefilter: bool,
    /// Keep at most this many candidates per slot after ranking.
    pub max_candidates_per_slot: Option<usize>,
    /// Budget applied when the profile omits one (per meal).
    pub default_budget: f64,
    /// Whole-request timeout for the remote source; it is not retried.
    pub remote_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            targets: TargetConfig::default(),
            slots: SlotConfig::default(),
            bounds: ProfileBounds::default(),
            nutrition_tolerance: NUTRITION_TOLERANCE,
            budget_prefilter: false,
            max_candidates_per_slot: None,
            default_budget: DEFAULT_BUDGET,
            remote_timeout_secs: REMOTE_TIMEOUT_SECS,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                let config: EngineConfig = serde_json::from_str(&content)?;
                debug!(path = %path.display(), "loaded engine config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.targets.activity_high, 1.725);
        assert_eq!(config.targets.fat_calorie_share, 0.30);
        assert_eq!(config.slots.lunch_max_calories, 500.0);
        assert_eq!(config.nutrition_tolerance, 0.20);
        assert!(!config.budget_prefilter);
        assert_eq!(config.remote_timeout_secs, 10);
    }

    #[test]
    fn test_partial_override() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"targets": {"activity_high": 1.9}, "budget_prefilter": true}"#)
            .unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.targets.activity_high, 1.9);
        assert_eq!(config.targets.activity_medium, ACTIVITY_MEDIUM);
        assert!(config.budget_prefilter);
        assert_eq!(config.slots, SlotConfig::default());
    }

    #[test]
    fn test_no_path_is_default() {
        assert_eq!(EngineConfig::load(None).unwrap(), EngineConfig::default());
    }
}
