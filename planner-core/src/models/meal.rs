use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::PlannerError;

/// A meal assigned to a day slot.
///
/// Ingredients are kept as the free-text, comma-separated list the user
/// typed; the grocery reconciler splits them when it needs names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub ingredients: String,
}

impl Meal {
    /// Creates a meal with a fresh id. Both fields are trimmed.
    pub fn new(name: &str, ingredients: &str) -> Result<Self, PlannerError> {
        Self::with_id(Uuid::new_v4(), name, ingredients)
    }

    /// Creates a meal that keeps an existing id, used when editing.
    pub fn with_id(id: Uuid, name: &str, ingredients: &str) -> Result<Self, PlannerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::EmptyMealName);
        }
        Ok(Self {
            id,
            name: name.to_string(),
            ingredients: ingredients.trim().to_string(),
        })
    }

    /// Returns an edited copy with the same id.
    pub fn edited(&self, name: &str, ingredients: &str) -> Result<Self, PlannerError> {
        Self::with_id(self.id, name, ingredients)
    }

    /// Name normalized for repetition comparisons.
    pub fn comparable_name(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Appends AI-fetched ingredients to the existing list.
    pub fn append_ingredients(&self, extra: &str) -> Self {
        let extra = extra.trim();
        let ingredients = match (self.ingredients.is_empty(), extra.is_empty()) {
            (_, true) => self.ingredients.clone(),
            (true, false) => extra.to_string(),
            (false, false) => format!("{}, {}", self.ingredients, extra),
        };
        Self {
            ingredients,
            ..self.clone()
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ingredients.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.ingredients)
        }
    }
}
