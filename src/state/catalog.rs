use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::models::{FoodId, FoodItem};
use crate::planner::constants::FUZZY_MATCH_THRESHOLD;

/// Read-only food catalog.
///
/// Keeps catalog order (ranking ties fall back to it) and indexes foods by id
/// and by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    foods: Vec<FoodItem>,
    by_id: HashMap<FoodId, usize>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build from a list of foods. A repeated id replaces the earlier entry
    /// in place.
    pub fn new(foods: Vec<FoodItem>) -> Self {
        let mut catalog = Self::default();
        for food in foods {
            match catalog.by_id.get(&food.id) {
                Some(&idx) => catalog.foods[idx] = food,
                None => {
                    catalog.by_id.insert(food.id.clone(), catalog.foods.len());
                    catalog.foods.push(food);
                }
            }
        }
        for (idx, food) in catalog.foods.iter().enumerate() {
            catalog.by_name.insert(food.name.to_lowercase(), idx);
        }
        catalog
    }

    pub fn get(&self, id: &FoodId) -> Option<&FoodItem> {
        self.by_id.get(id).map(|&idx| &self.foods[idx])
    }

    /// Get a food by name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Option<&FoodItem> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.foods[idx])
    }

    /// Resolve a user-typed reference: id first, then exact name.
    pub fn lookup(&self, reference: &str) -> Option<&FoodItem> {
        self.get(&FoodId::from(reference.trim()))
            .or_else(|| self.get_by_name(reference))
    }

    /// Foods whose name is close to `query`, best match first.
    pub fn fuzzy_matches(&self, query: &str) -> Vec<(&FoodItem, f64)> {
        let query = query.trim().to_lowercase();
        let mut candidates: Vec<(&FoodItem, f64)> = self
            .foods
            .iter()
            .map(|f| (f, jaro_winkler(&f.name.to_lowercase(), &query)))
            .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates
    }

    pub fn as_slice(&self) -> &[FoodItem] {
        &self.foods
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodRecord;

    fn food(id: &str, name: &str, calories: f64) -> FoodItem {
        FoodItem::from_record(FoodRecord {
            id: Some(FoodId::from(id)),
            name: Some(name.to_string()),
            calories: Some(calories),
            ..Default::default()
        })
        .unwrap()
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            food("1", "Salmon Fillet", 280.0),
            food("2", "Brown Rice Bowl", 420.0),
            food("3", "Greek Yogurt", 150.0),
        ])
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let catalog = sample_catalog();
        assert_eq!(catalog.lookup("2").unwrap().name, "Brown Rice Bowl");
        assert_eq!(catalog.lookup("greek yogurt").unwrap().id.as_str(), "3");
        assert!(catalog.lookup("pizza").is_none());
    }

    #[test]
    fn test_duplicate_id_replaces_in_place() {
        let catalog = Catalog::new(vec![
            food("1", "Apple", 95.0),
            food("2", "Bread", 200.0),
            food("1", "Green Apple", 80.0),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.as_slice()[0].name, "Green Apple");
        assert!(catalog.get_by_name("apple").is_none());
    }

    #[test]
    fn test_fuzzy_matches() {
        let catalog = sample_catalog();
        let matches = catalog.fuzzy_matches("salmon filet");
        assert!(!matches.is_empty());
        assert_eq!(matches[0].0.id.as_str(), "1");
    }
}
