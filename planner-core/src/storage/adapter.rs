//! Typed persistence on top of a [`KeyValueStore`].
//!
//! Loading never fails: a missing, unreadable or unparsable value falls back
//! to that key's default and the problem is logged. Saving reports errors so
//! the caller can decide how loud to be about them.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, StorageError, StoreKey};
use crate::models::{DietPreference, GroceryList};
use crate::store::MealStore;

/// Everything the planner persists, loaded in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub meals: MealStore,
    pub grocery: GroceryList,
    pub diet: DietPreference,
}

#[derive(Debug, Clone)]
pub struct PersistenceAdapter<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_all(&self) -> PersistedState {
        PersistedState {
            meals: self.load_meals(),
            grocery: self.load_grocery(),
            diet: self.load_diet(),
        }
    }

    pub fn load_meals(&self) -> MealStore {
        self.load_or_default(StoreKey::Meals)
    }

    pub fn load_grocery(&self) -> GroceryList {
        self.load_or_default(StoreKey::Grocery)
    }

    pub fn load_diet(&self) -> DietPreference {
        self.load_or_default(StoreKey::DietPreference)
    }

    pub fn save_meals(&self, meals: &MealStore) -> Result<(), StorageError> {
        self.save(StoreKey::Meals, meals)
    }

    pub fn save_grocery(&self, grocery: &GroceryList) -> Result<(), StorageError> {
        self.save(StoreKey::Grocery, grocery)
    }

    pub fn save_diet(&self, diet: DietPreference) -> Result<(), StorageError> {
        self.save(StoreKey::DietPreference, &diet)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: StoreKey) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!("Failed to read {}, using default: {}", key, e);
                return T::default();
            }
        };

        decode(&raw).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}, using default: {}", key, e);
            T::default()
        })
    }

    fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|source| StorageError::Serialize { key, source })?;
        self.store.set(key, &raw)
    }
}

/// Parses a stored value.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Meal, MealSlot};
    use crate::storage::{FileStore, MemoryStore};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_state() -> PersistedState {
        let meals = MealStore::new().set_meal(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            MealSlot::Lunch,
            Meal::new("Pasta", "pasta, tomato").unwrap(),
        );
        let grocery = GroceryList::new().add_item("pasta");
        PersistedState {
            meals,
            grocery,
            diet: DietPreference::Pescatarian,
        }
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let adapter = PersistenceAdapter::new(MemoryStore::new());
        let state = adapter.load_all();

        assert!(state.meals.is_empty());
        assert!(state.grocery.is_empty());
        assert_eq!(state.diet, DietPreference::Flexitarian);
    }

    #[test]
    fn test_save_and_load_through_files() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = PersistenceAdapter::new(FileStore::new(temp_dir.path().to_path_buf()));
        let state = sample_state();

        adapter.save_meals(&state.meals).unwrap();
        adapter.save_grocery(&state.grocery).unwrap();
        adapter.save_diet(state.diet).unwrap();

        let reopened = PersistenceAdapter::new(FileStore::new(temp_dir.path().to_path_buf()));
        assert_eq!(reopened.load_all(), state);
    }

    #[test]
    fn test_corrupt_key_falls_back_alone() {
        let store = MemoryStore::new();
        store.set(StoreKey::Meals, "{not json").unwrap();
        store.set(StoreKey::DietPreference, "1").unwrap();
        store.set(StoreKey::Grocery, "[1, 2, 3]").unwrap();

        let state = PersistenceAdapter::new(store).load_all();

        assert!(state.meals.is_empty());
        assert!(state.grocery.is_empty());
        assert_eq!(state.diet, DietPreference::Vegetarian);
    }

    #[test]
    fn test_out_of_range_diet_falls_back() {
        let store = MemoryStore::new();
        store.set(StoreKey::DietPreference, "9").unwrap();
        assert_eq!(
            PersistenceAdapter::new(store).load_diet(),
            DietPreference::Flexitarian
        );
    }

    #[test]
    fn test_meals_written_as_pairs() {
        let adapter = PersistenceAdapter::new(MemoryStore::new());
        adapter.save_meals(&sample_state().meals).unwrap();

        let raw = adapter.store().get(StoreKey::Meals).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0][0], "2024-01-01");
        assert_eq!(value[0][1]["Lunch"]["name"], "Pasta");
    }

    #[test]
    fn test_decode() {
        let diet: DietPreference = decode("0").unwrap();
        assert_eq!(diet, DietPreference::Vegan);
        assert!(decode::<GroceryList>("nope").is_err());
    }
}
