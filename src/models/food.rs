use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PlannerError, Result};

/// Stable catalog identifier. Catalogs may carry integer or string ids; both
/// are kept as their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FoodId(String);

impl FoodId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FoodId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for FoodId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for FoodId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => FoodId(n.to_string()),
            RawId::Str(s) => FoodId(s.trim().to_string()),
        })
    }
}

/// Food category as stored in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Protein,
    Carb,
    Vegetable,
    Fruit,
    Burger,
    Salad,
    Soup,
    Meat,
    Seafood,
    Dairy,
    Other,
}

impl Category {
    /// Case-insensitive parse; anything unrecognized is `Other`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "protein" => Category::Protein,
            "carb" | "carbs" => Category::Carb,
            "vegetable" | "vegetables" => Category::Vegetable,
            "fruit" | "fruits" => Category::Fruit,
            "burger" => Category::Burger,
            "salad" => Category::Salad,
            "soup" => Category::Soup,
            "meat" => Category::Meat,
            "seafood" => Category::Seafood,
            "dairy" => Category::Dairy,
            _ => Category::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Protein => "protein",
            Category::Carb => "carb",
            Category::Vegetable => "vegetable",
            Category::Fruit => "fruit",
            Category::Burger => "burger",
            Category::Salad => "salad",
            Category::Soup => "soup",
            Category::Meat => "meat",
            Category::Seafood => "seafood",
            Category::Dairy => "dairy",
            Category::Other => "other",
        }
    }
}

/// Loosely-typed catalog row as it arrives from a file or a remote service.
///
/// Every field is optional; `FoodItem::from_record` fills defaults once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodRecord {
    #[serde(alias = "foodId")]
    pub id: Option<FoodId>,
    pub name: Option<String>,
    #[serde(alias = "kcal")]
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    #[serde(alias = "fats")]
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
    pub price: Option<f64>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A validated, fully-populated catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodId,
    pub name: String,
    pub calories: u32,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub price: f64,
    pub category: Category,
    /// Lowercased; drives slot suitability, dietary markers and allergy matches.
    pub tags: BTreeSet<String>,
}

impl FoodItem {
    /// Build a catalog entry from a loose record.
    ///
    /// Missing numbers become 0, tags are lowercased and deduplicated, and an
    /// unknown category becomes `Other`. A missing id or name, or any negative
    /// number, is rejected.
    pub fn from_record(record: FoodRecord) -> Result<Self> {
        let id = record
            .id
            .filter(|id| !id.as_str().is_empty())
            .ok_or_else(|| PlannerError::InvalidInput("food record without an id".to_string()))?;

        let name = record
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| PlannerError::InvalidInput(format!("food {} has no name", id)))?;

        let non_negative = |field: &str, value: Option<f64>| -> Result<f64> {
            let value = value.unwrap_or(0.0);
            if value.is_finite() && value >= 0.0 {
                Ok(value)
            } else {
                Err(PlannerError::InvalidInput(format!(
                    "{}: {} must be a non-negative number, got {}",
                    name, field, value
                )))
            }
        };

        let calories = non_negative("calories", record.calories)?.round() as u32;
        let protein = non_negative("protein", record.protein)?;
        let fat = non_negative("fat", record.fat)?;
        let carbs = non_negative("carbs", record.carbs)?;
        let price = non_negative("price", record.price)?;

        let tags = record
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let category = record
            .category
            .as_deref()
            .map(Category::parse)
            .unwrap_or(Category::Other);

        Ok(Self {
            id,
            name,
            calories,
            protein,
            fat,
            carbs,
            price,
            category,
            tags,
        })
    }

    /// Check for an exact (already lowercased) tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_protein(&self) -> bool {
        self.category == Category::Protein
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{} [{}]: {} kcal, P:{} F:{} C:{}, price:{}, {}",
            self.name,
            self.id,
            self.calories,
            self.protein,
            self.fat,
            self.carbs,
            self.price,
            self.category.as_str()
        )
    }
}
