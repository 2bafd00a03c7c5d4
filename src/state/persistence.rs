use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{FoodId, FoodItem, FoodRecord, MealPlan, RawProfile};
use crate::planner::weekly::WeeklyProjection;
use crate::state::Catalog;

/// CSV catalog row; tags are `;`-separated.
#[derive(Debug, Deserialize)]
struct CsvFoodRecord {
    id: String,
    name: Option<String>,
    calories: Option<f64>,
    protein: Option<f64>,
    fat: Option<f64>,
    carbs: Option<f64>,
    price: Option<f64>,
    category: Option<String>,
    tags: Option<String>,
}

impl From<CsvFoodRecord> for FoodRecord {
    fn from(row: CsvFoodRecord) -> Self {
        FoodRecord {
            id: Some(FoodId::new(row.id.trim())),
            name: row.name,
            calories: row.calories,
            protein: row.protein,
            fat: row.fat,
            carbs: row.carbs,
            price: row.price,
            category: row.category,
            tags: row
                .tags
                .map(|t| t.split(';').map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Parse a JSON array of food records.
pub fn parse_catalog_json(content: &str) -> Result<Vec<FoodItem>> {
    let records: Vec<FoodRecord> = serde_json::from_str(content)?;
    records.into_iter().map(FoodItem::from_record).collect()
}

/// Load a catalog from a `.json` or `.csv` file.
///
/// Records are validated once here; a repeated id keeps the last occurrence.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();

    let foods = if is_csv(path) {
        let mut reader = csv::Reader::from_path(path)?;
        let mut foods = Vec::new();
        for row in reader.deserialize::<CsvFoodRecord>() {
            foods.push(FoodItem::from_record(row?.into())?);
        }
        foods
    } else {
        parse_catalog_json(&fs::read_to_string(path)?)?
    };

    let catalog = Catalog::new(foods);
    info!(path = %path.display(), foods = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Load raw profile input from JSON.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<RawProfile> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_profile<P: AsRef<Path>>(path: P, profile: &RawProfile) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(profile)?)?;
    Ok(())
}

/// Load a saved plan, or `None` when the file does not exist yet.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<Option<MealPlan>> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "no saved plan");
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

pub fn save_plan<P: AsRef<Path>>(path: P, plan: &MealPlan) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(plan)?)?;
    Ok(())
}

/// Write one row per day and slot of a weekly projection.
pub fn write_week_csv<P: AsRef<Path>>(projection: &WeeklyProjection, path: P) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["day", "slot", "foods", "day_calories", "day_cost"])?;

    for day in &projection.days {
        for (slot, foods) in &day.meals {
            let names: Vec<&str> = foods.iter().map(|f| f.name.as_str()).collect();
            wtr.write_record([
                day.day.to_string(),
                slot.to_string(),
                names.join("; "),
                format!("{:.0}", day.total_calories),
                format!("{:.2}", day.total_cost),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use crate::models::{MealCount, MealSlot};
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_load_json_catalog() {
        let json = r#"[
            {"foodId": 1, "name": "Grilled Chicken Salad", "kcal": 350, "protein": 30, "fat": 15, "carbs": 20, "price": 7000, "tags": ["healthy", "High-Protein"]},
            {"id": "2", "name": "Oatmeal", "calories": 250, "category": "carb", "tags": ["breakfast"]}
        ]"#;

        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let salad = catalog.lookup("1").unwrap();
        assert!(salad.has_tag("high-protein"));
        assert_eq!(salad.calories, 350);
    }

    #[test]
    fn test_load_csv_catalog() {
        let csv = "id,name,calories,protein,fat,carbs,price,category,tags\n\
                   10,Beef Steak,500,40,30,10,12000,meat,dinner;high-protein\n\
                   11,Blueberries,80,1,0,20,2000,fruit,\n";

        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let steak = catalog.get_by_name("beef steak").unwrap();
        assert!(steak.has_tag("dinner"));
        assert!(steak.has_tag("high-protein"));
        assert!(catalog.lookup("11").unwrap().tags.is_empty());
    }

    #[test]
    fn test_plan_roundtrip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        assert!(load_plan(&path).unwrap().is_none());

        let mut plan = MealPlan::new(MealCount::Three);
        plan.add(MealSlot::Dinner, FoodId::from("5")).unwrap();
        save_plan(&path, &plan).unwrap();

        assert_eq!(load_plan(&path).unwrap(), Some(plan));
    }

    #[test]
    fn test_profile_roundtrip() {
        let raw = RawProfile {
            gender: Some("female".to_string()),
            age: Some(41.0),
            allergies: vec!["peanut".to_string()],
            ..Default::default()
        };
        let file = NamedTempFile::new().unwrap();
        save_profile(file.path(), &raw).unwrap();

        let loaded = load_profile(file.path()).unwrap();
        assert_eq!(loaded.gender.as_deref(), Some("female"));
        assert_eq!(loaded.allergies, vec!["peanut".to_string()]);
    }

    #[test]
    fn test_load_plan_rejects_food_in_two_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(
            &path,
            r#"{"mealCount": 3, "slots": {"breakfast": ["4"], "dinner": ["4"]}}"#,
        )
        .unwrap();

        assert!(matches!(load_plan(&path), Err(PlannerError::Json(_))));
    }
}
