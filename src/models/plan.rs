use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::food::{FoodId, FoodItem};
use crate::models::profile::MealCount;
use crate::state::Catalog;

/// A meal of the day that foods are bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            other => Err(format!("unknown meal slot '{}'", other)),
        }
    }
}

/// The user's in-progress selection: food ids per slot.
///
/// A food id lives in at most one slot; adding it to another slot moves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredPlan")]
pub struct MealPlan {
    meal_count: MealCount,
    slots: BTreeMap<MealSlot, Vec<FoodId>>,
}

/// Plan as read from disk, before the slot invariants are checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPlan {
    meal_count: MealCount,
    #[serde(default)]
    slots: BTreeMap<MealSlot, Vec<FoodId>>,
}

impl TryFrom<StoredPlan> for MealPlan {
    type Error = String;

    /// Rejects slots outside the layout and ids that appear more than once.
    fn try_from(stored: StoredPlan) -> std::result::Result<Self, Self::Error> {
        let mut plan = MealPlan::new(stored.meal_count);
        for (slot, ids) in stored.slots {
            if !stored.meal_count.slots().contains(&slot) {
                return Err(format!(
                    "{} is not part of a {}-meal plan",
                    slot,
                    stored.meal_count.per_day()
                ));
            }
            for id in ids {
                if let Some(existing) = plan.slot_of(&id) {
                    return Err(format!("food {} listed twice ({} and {})", id, existing, slot));
                }
                plan.slots.entry(slot).or_default().push(id);
            }
        }
        Ok(plan)
    }
}

impl MealPlan {
    /// Empty plan with one slot per meal of the layout.
    pub fn new(meal_count: MealCount) -> Self {
        let slots = meal_count
            .slots()
            .iter()
            .map(|slot| (*slot, Vec::new()))
            .collect();
        Self { meal_count, slots }
    }

    pub fn meal_count(&self) -> MealCount {
        self.meal_count
    }

    fn check_slot(&self, slot: MealSlot) -> Result<()> {
        if self.meal_count.slots().contains(&slot) {
            Ok(())
        } else {
            Err(PlannerError::InvalidInput(format!(
                "{} is not part of a {}-meal plan",
                slot,
                self.meal_count.per_day()
            )))
        }
    }

    /// Add a food to a slot, moving it out of any other slot.
    ///
    /// Returns false when the food was already in that slot.
    pub fn add(&mut self, slot: MealSlot, id: FoodId) -> Result<bool> {
        self.check_slot(slot)?;
        if self.slot_of(&id) == Some(slot) {
            return Ok(false);
        }
        for foods in self.slots.values_mut() {
            foods.retain(|existing| existing != &id);
        }
        self.slots.entry(slot).or_default().push(id);
        Ok(true)
    }

    /// Remove a food from a slot. Returns false when it was not there.
    pub fn remove(&mut self, slot: MealSlot, id: &FoodId) -> Result<bool> {
        self.check_slot(slot)?;
        let foods = self.slots.entry(slot).or_default();
        let before = foods.len();
        foods.retain(|existing| existing != id);
        Ok(foods.len() != before)
    }

    pub fn clear_slot(&mut self, slot: MealSlot) -> Result<()> {
        self.check_slot(slot)?;
        self.slots.entry(slot).or_default().clear();
        Ok(())
    }

    pub fn clear(&mut self) {
        for foods in self.slots.values_mut() {
            foods.clear();
        }
    }

    /// Slot currently holding the food, if any.
    pub fn slot_of(&self, id: &FoodId) -> Option<MealSlot> {
        self.slots
            .iter()
            .find(|(_, foods)| foods.contains(id))
            .map(|(slot, _)| *slot)
    }

    pub fn foods_in(&self, slot: MealSlot) -> &[FoodId] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All ids in slot order.
    pub fn all_ids(&self) -> Vec<&FoodId> {
        self.meal_count
            .slots()
            .iter()
            .flat_map(|slot| self.foods_in(*slot))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Required slots with no food.
    pub fn missing_slots(&self) -> Vec<MealSlot> {
        self.meal_count
            .slots()
            .iter()
            .copied()
            .filter(|slot| self.foods_in(*slot).is_empty())
            .collect()
    }

    /// Look up every referenced food, failing on the first unknown id.
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Result<BTreeMap<MealSlot, Vec<&'a FoodItem>>> {
        let mut resolved = BTreeMap::new();
        for slot in self.meal_count.slots() {
            let foods = self
                .foods_in(*slot)
                .iter()
                .map(|id| {
                    catalog
                        .get(id)
                        .ok_or_else(|| PlannerError::FoodNotFound(id.to_string()))
                })
                .collect::<Result<Vec<_>>>()?;
            resolved.insert(*slot, foods);
        }
        Ok(resolved)
    }
}
