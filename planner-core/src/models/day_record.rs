use serde::{Deserialize, Serialize};

use super::{Meal, MealSlot};

/// Meal assignments and the eating-out flag for one calendar day.
///
/// Marking a day as eating out does not clear its meals; they stay stored
/// but are excluded from the grocery list until the flag is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(rename = "Lunch", default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<Meal>,
    #[serde(rename = "Dinner", default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<Meal>,
    #[serde(rename = "isEatingOut", default)]
    pub is_eating_out: bool,
}

impl DayRecord {
    pub fn meal(&self, slot: MealSlot) -> Option<&Meal> {
        match slot {
            MealSlot::Lunch => self.lunch.as_ref(),
            MealSlot::Dinner => self.dinner.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: MealSlot) -> &mut Option<Meal> {
        match slot {
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    /// Returns a copy with `meal` in `slot`.
    pub fn with_meal(&self, slot: MealSlot, meal: Meal) -> Self {
        let mut next = self.clone();
        *next.slot_mut(slot) = Some(meal);
        next
    }

    /// Returns a copy with `slot` cleared.
    pub fn without_meal(&self, slot: MealSlot) -> Self {
        let mut next = self.clone();
        *next.slot_mut(slot) = None;
        next
    }

    /// Returns a copy with the eating-out flag flipped.
    pub fn toggled_eating_out(&self) -> Self {
        Self {
            is_eating_out: !self.is_eating_out,
            ..self.clone()
        }
    }

    /// Present meals in slot order.
    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &Meal)> {
        MealSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.meal(slot).map(|m| (slot, m)))
    }

    pub fn has_meals(&self) -> bool {
        self.lunch.is_some() || self.dinner.is_some()
    }

    /// A record with no meals that is not eating out carries no information
    /// and is never kept in the store.
    pub fn is_empty(&self) -> bool {
        !self.has_meals() && !self.is_eating_out
    }
}
