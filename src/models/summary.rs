use serde::{Deserialize, Serialize};

/// Daily targets derived from a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    /// Per-meal budget.
    pub budget: f64,
}

/// Totals summed over a selection of foods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetActual {
    pub target: f64,
    pub actual: f64,
}

impl TargetActual {
    pub fn new(target: f64, actual: f64) -> Self {
        Self { target, actual }
    }

    /// True when `actual` lies within `tolerance` (relative) of `target`.
    pub fn within(&self, tolerance: f64) -> bool {
        let low = self.target * (1.0 - tolerance);
        let high = self.target * (1.0 + tolerance);
        self.actual >= low && self.actual <= high
    }

    /// Actual as a percentage of target; 0 when the target is 0.
    pub fn percent(&self) -> f64 {
        if self.target > 0.0 {
            self.actual / self.target * 100.0
        } else {
            0.0
        }
    }
}

/// Target/actual pairs shown next to a recommendation or plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub calories: TargetActual,
    pub protein: TargetActual,
    pub fat: TargetActual,
    pub carbs: TargetActual,
    /// Per-meal budget against the average per-meal cost of the selection.
    pub budget: TargetActual,
    /// Some selected food matches a profile allergy.
    pub allergy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_tolerance_edges() {
        assert!(TargetActual::new(100.0, 80.0).within(0.2));
        assert!(TargetActual::new(100.0, 120.0).within(0.2));
        assert!(!TargetActual::new(100.0, 79.0).within(0.2));
        assert!(!TargetActual::new(100.0, 121.0).within(0.2));
    }

    #[test]
    fn test_percent_zero_target() {
        assert_eq!(TargetActual::new(0.0, 50.0).percent(), 0.0);
        assert_eq!(TargetActual::new(200.0, 50.0).percent(), 25.0);
    }
}
