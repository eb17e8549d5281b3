//! Grocery list for the whole plan.
//!
//! Items are unique by name, compared case-insensitively. The list is a value:
//! every operation returns a new list and leaves the receiver untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A single entry on the grocery list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: Uuid,
    pub name: String,
    pub checked: bool,
}

impl GroceryItem {
    /// Creates an unchecked item with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            checked: false,
        }
    }

    /// Name used for uniqueness comparisons.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for GroceryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.checked { "[x]" } else { "[ ]" };
        write!(f, "{} {}", check, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroceryList {
    items: Vec<GroceryItem>,
}

impl GroceryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<GroceryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[GroceryItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroceryItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|i| i.checked).count()
    }

    pub fn get(&self, id: Uuid) -> Option<&GroceryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Find an item by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&GroceryItem> {
        self.items.iter().find(|i| i.matches_name(name))
    }

    /// Appends an unchecked item unless the trimmed name is empty or already
    /// listed.
    #[must_use]
    pub fn add_item(&self, name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || self.find_by_name(name).is_some() {
            return self.clone();
        }
        let mut items = self.items.clone();
        items.push(GroceryItem::new(name));
        Self { items }
    }

    /// Flips the checked state of the item with `id`, if present.
    #[must_use]
    pub fn toggle_item(&self, id: Uuid) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    GroceryItem {
                        checked: !item.checked,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    /// Removes the item with `id`, if present.
    #[must_use]
    pub fn remove_item(&self, id: Uuid) -> Self {
        let items = self.items.iter().filter(|i| i.id != id).cloned().collect();
        Self { items }
    }
}

impl<'a> IntoIterator for &'a GroceryList {
    type Item = &'a GroceryItem;
    type IntoIter = std::slice::Iter<'a, GroceryItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
