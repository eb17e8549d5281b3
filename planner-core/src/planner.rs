//! The planner application root.
//!
//! [`Planner`] owns the current meal, grocery and diet snapshots plus the
//! pending repetition warning, and drives every change through the same
//! pipeline: guard, store mutation, grocery reconciliation, write-through.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::ai::MealSuggestion;
use crate::error::PlannerError;
use crate::guard::{self, GuardDecision, RepetitionWarning};
use crate::models::{DietPreference, GroceryList, Meal, MealSlot};
use crate::reconcile::reconcile;
use crate::storage::{decode, KeyValueStore, PersistenceAdapter, StorageEvent, StoreKey};
use crate::store::MealStore;

/// Result of a guarded meal write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The write is held as the pending warning until it is confirmed or
    /// cancelled.
    Blocked(RepetitionWarning),
}

pub struct Planner<S> {
    meals: Arc<MealStore>,
    grocery: Arc<GroceryList>,
    diet: DietPreference,
    pending: Option<RepetitionWarning>,
    persistence: PersistenceAdapter<S>,
}

impl<S: KeyValueStore> Planner<S> {
    /// Hydrates a planner from `store`. Unreadable keys start from their
    /// defaults.
    pub fn load(store: S) -> Self {
        let persistence = PersistenceAdapter::new(store);
        let state = persistence.load_all();
        tracing::debug!(
            "Loaded {} planned days, {} grocery items, diet {}",
            state.meals.len(),
            state.grocery.len(),
            state.diet
        );

        Self {
            meals: Arc::new(state.meals),
            grocery: Arc::new(state.grocery),
            diet: state.diet,
            pending: None,
            persistence,
        }
    }

    pub fn meals(&self) -> Arc<MealStore> {
        Arc::clone(&self.meals)
    }

    pub fn grocery(&self) -> Arc<GroceryList> {
        Arc::clone(&self.grocery)
    }

    pub fn diet(&self) -> DietPreference {
        self.diet
    }

    pub fn pending(&self) -> Option<&RepetitionWarning> {
        self.pending.as_ref()
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Writes `meal` into `slot` on `date` unless it would be the third day
    /// in a row, in which case it becomes the pending warning.
    ///
    /// Days marked as eating out are read-only.
    pub fn save_meal(
        &mut self,
        date: NaiveDate,
        slot: MealSlot,
        meal: Meal,
    ) -> Result<SaveOutcome, PlannerError> {
        self.ensure_editable(date)?;
        match guard::check(&self.meals, date, slot, &meal) {
            GuardDecision::Proceed => {
                self.pending = None;
                self.commit_meals(self.meals.set_meal(date, slot, meal));
                Ok(SaveOutcome::Saved)
            }
            GuardDecision::Blocked(warning) => {
                tracing::info!(
                    "Holding {} for {} {}: already planned the two days before",
                    warning.meal.name,
                    date,
                    slot
                );
                self.pending = Some(warning.clone());
                Ok(SaveOutcome::Blocked(warning))
            }
        }
    }

    /// Adds an AI suggestion to the plan as a new meal.
    pub fn add_suggested_meal(
        &mut self,
        date: NaiveDate,
        slot: MealSlot,
        suggestion: &MealSuggestion,
    ) -> Result<SaveOutcome, PlannerError> {
        if suggestion.ingredients.trim().is_empty() {
            return Err(PlannerError::MissingIngredients(suggestion.name.clone()));
        }
        let meal = Meal::new(&suggestion.name, &suggestion.ingredients)?;
        self.save_meal(date, slot, meal)
    }

    /// Applies the pending write as it was proposed.
    pub fn confirm_repetition(&mut self) -> Result<RepetitionWarning, PlannerError> {
        let warning = self.pending.take().ok_or(PlannerError::NothingPending)?;
        self.ensure_editable(warning.date)?;
        self.commit_meals(
            self.meals
                .set_meal(warning.date, warning.slot, warning.meal.clone()),
        );
        Ok(warning)
    }

    /// Drops the pending write, returning it if there was one.
    pub fn cancel_repetition(&mut self) -> Option<RepetitionWarning> {
        self.pending.take()
    }

    /// Clears `slot` on `date`. An empty slot leaves the plan as it is but
    /// still reconciles the grocery list.
    pub fn delete_meal(&mut self, date: NaiveDate, slot: MealSlot) -> Result<(), PlannerError> {
        self.ensure_editable(date)?;
        self.commit_meals(self.meals.delete_meal(date, slot));
        Ok(())
    }

    pub fn toggle_eating_out(&mut self, date: NaiveDate) {
        self.commit_meals(self.meals.toggle_eating_out(date));
    }

    pub fn add_grocery_item(&mut self, name: &str) {
        self.commit_grocery(self.grocery.add_item(name));
    }

    pub fn toggle_grocery_item(&mut self, id: Uuid) {
        self.commit_grocery(self.grocery.toggle_item(id));
    }

    pub fn remove_grocery_item(&mut self, id: Uuid) {
        self.commit_grocery(self.grocery.remove_item(id));
    }

    pub fn set_diet_preference(&mut self, diet: DietPreference) {
        self.diet = diet;
        if let Err(e) = self.persistence.save_diet(diet) {
            tracing::warn!("Failed to save diet preference: {}", e);
        }
    }

    /// Replaces one piece of state with a value written by another process.
    ///
    /// Removed keys and unparsable values are ignored. Nothing is written
    /// back. Returns whether the state changed.
    pub fn apply_external_change(&mut self, event: &StorageEvent) -> bool {
        let Some(raw) = event.new_value.as_deref() else {
            tracing::debug!("Ignoring removal of {}", event.key);
            return false;
        };

        let applied = match event.key {
            StoreKey::Meals => decode::<MealStore>(raw).map(|meals| self.meals = Arc::new(meals)),
            StoreKey::Grocery => {
                decode::<GroceryList>(raw).map(|grocery| self.grocery = Arc::new(grocery))
            }
            StoreKey::DietPreference => decode::<DietPreference>(raw).map(|diet| self.diet = diet),
        };

        match applied {
            Ok(()) => {
                tracing::info!("Reloaded {} from another planner", event.key);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to parse {} from another planner: {}", event.key, e);
                false
            }
        }
    }

    fn ensure_editable(&self, date: NaiveDate) -> Result<(), PlannerError> {
        match self.meals.day(date) {
            Some(record) if record.is_eating_out => Err(PlannerError::EatingOut(date)),
            _ => Ok(()),
        }
    }

    fn commit_meals(&mut self, meals: MealStore) {
        let grocery = reconcile(&meals, &self.grocery);
        self.meals = Arc::new(meals);
        self.grocery = Arc::new(grocery);

        if let Err(e) = self.persistence.save_meals(&self.meals) {
            tracing::warn!("Failed to save meals: {}", e);
        }
        if let Err(e) = self.persistence.save_grocery(&self.grocery) {
            tracing::warn!("Failed to save grocery list: {}", e);
        }
    }

    fn commit_grocery(&mut self, grocery: GroceryList) {
        if grocery == *self.grocery {
            return;
        }
        self.grocery = Arc::new(grocery);
        if let Err(e) = self.persistence.save_grocery(&self.grocery) {
            tracing::warn!("Failed to save grocery list: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn meal(name: &str, ingredients: &str) -> Meal {
        Meal::new(name, ingredients).unwrap()
    }

    fn planner() -> Planner<Arc<MemoryStore>> {
        Planner::load(Arc::new(MemoryStore::new()))
    }

    fn grocery_names<S: KeyValueStore>(planner: &Planner<S>) -> Vec<String> {
        planner.grocery().iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn test_save_meal_builds_grocery_list() {
        let mut planner = planner();
        let outcome = planner
            .save_meal(date(2024, 1, 1), MealSlot::Lunch, meal("Pasta", "pasta, tomato, basil"))
            .unwrap();

        assert_eq!(outcome, SaveOutcome::Saved);
        assert_eq!(planner.meals().len(), 1);
        assert_eq!(grocery_names(&planner), vec!["pasta", "tomato", "basil"]);
        assert!(planner.grocery().iter().all(|i| !i.checked));
    }

    #[test]
    fn test_eating_out_clears_grocery_but_keeps_record() {
        let mut planner = planner();
        let day = date(2024, 1, 1);
        planner
            .save_meal(day, MealSlot::Lunch, meal("Pasta", "pasta, tomato, basil"))
            .unwrap();
        planner.toggle_eating_out(day);

        let record = planner.meals().day(day).cloned().unwrap();
        assert!(record.is_eating_out);
        assert!(record.lunch.is_some());
        assert!(planner.grocery().is_empty());
    }

    #[test]
    fn test_delete_meal_twice_same_as_once() {
        let mut planner = planner();
        let day = date(2024, 1, 1);
        planner.save_meal(day, MealSlot::Lunch, meal("Pasta", "pasta")).unwrap();
        planner.save_meal(day, MealSlot::Dinner, meal("Soup", "leek")).unwrap();

        planner.delete_meal(day, MealSlot::Lunch).unwrap();
        let once = planner.meals();
        planner.delete_meal(day, MealSlot::Lunch).unwrap();

        assert_eq!(*planner.meals(), *once);
        assert_eq!(grocery_names(&planner), vec!["leek"]);
    }

    #[test]
    fn test_delete_missing_meal_leaves_plan_unchanged() {
        let mut planner = planner();
        planner.save_meal(date(2024, 1, 1), MealSlot::Lunch, meal("Pasta", "pasta")).unwrap();
        let before = planner.meals();

        planner.delete_meal(date(2024, 1, 1), MealSlot::Dinner).unwrap();
        planner.delete_meal(date(2024, 1, 2), MealSlot::Lunch).unwrap();

        assert_eq!(*planner.meals(), *before);
        assert_eq!(grocery_names(&planner), vec!["pasta"]);
    }

    #[test]
    fn test_delete_missing_meal_reconciles_grocery() {
        let mut planner = planner();
        planner.add_grocery_item("milk");

        planner.delete_meal(date(2024, 1, 1), MealSlot::Lunch).unwrap();

        assert_eq!(*planner.grocery(), reconcile(&planner.meals(), &GroceryList::new()));
        assert!(planner.grocery().is_empty());
        assert!(planner.store().get(StoreKey::Grocery).unwrap().is_some());
    }

    #[test]
    fn test_eating_out_day_is_read_only() {
        let mut planner = planner();
        let day = date(2024, 1, 1);
        planner.save_meal(day, MealSlot::Lunch, meal("Pasta", "pasta")).unwrap();
        planner.toggle_eating_out(day);
        let before = planner.meals();

        assert_eq!(
            planner.save_meal(day, MealSlot::Dinner, meal("Soup", "leek")),
            Err(PlannerError::EatingOut(day))
        );
        assert_eq!(
            planner.delete_meal(day, MealSlot::Lunch),
            Err(PlannerError::EatingOut(day))
        );
        let suggestion = MealSuggestion {
            name: "Kottu".to_string(),
            ingredients: "roti, leek".to_string(),
        };
        assert_eq!(
            planner.add_suggested_meal(day, MealSlot::Dinner, &suggestion),
            Err(PlannerError::EatingOut(day))
        );
        assert_eq!(*planner.meals(), *before);
        assert!(planner.grocery().is_empty());

        planner.toggle_eating_out(day);
        assert!(planner.delete_meal(day, MealSlot::Lunch).is_ok());
        assert!(planner.meals().is_empty());
    }

    #[test]
    fn test_confirm_rejected_once_day_is_eating_out() {
        let mut planner = planner();
        plan_rice_and_curry(&mut planner);
        let day = date(2024, 3, 3);
        planner
            .save_meal(day, MealSlot::Lunch, meal("Rice and Curry", "rice"))
            .unwrap();
        planner.toggle_eating_out(day);

        assert_eq!(planner.confirm_repetition(), Err(PlannerError::EatingOut(day)));
        assert!(planner.pending().is_none());
        assert!(planner.meals().meal(day, MealSlot::Lunch).is_none());
    }

    #[test]
    fn test_checked_state_survives_meal_changes() {
        let mut planner = planner();
        let day = date(2024, 1, 1);
        planner.save_meal(day, MealSlot::Lunch, meal("Pasta", "pasta, tomato")).unwrap();
        let tomato = planner.grocery().find_by_name("tomato").unwrap().id;
        planner.toggle_grocery_item(tomato);

        planner.save_meal(day, MealSlot::Dinner, meal("Salad", "Tomato, lettuce")).unwrap();

        let grocery = planner.grocery();
        let item = grocery.find_by_name("tomato").unwrap();
        assert_eq!(item.id, tomato);
        assert!(item.checked);
        assert_eq!(grocery.len(), 3);
    }

    #[test]
    fn test_snapshots_are_not_mutated() {
        let mut planner = planner();
        let before = planner.meals();
        planner.save_meal(date(2024, 1, 1), MealSlot::Lunch, meal("Pasta", "pasta")).unwrap();

        assert!(before.is_empty());
        assert_eq!(planner.meals().len(), 1);
    }

    fn plan_rice_and_curry(planner: &mut Planner<Arc<MemoryStore>>) {
        for day in [date(2024, 3, 1), date(2024, 3, 2)] {
            let outcome = planner.save_meal(day, MealSlot::Lunch, meal("Rice and Curry", "rice"));
            assert_eq!(outcome, Ok(SaveOutcome::Saved));
        }
    }

    #[test]
    fn test_third_repeat_is_held() {
        let mut planner = planner();
        plan_rice_and_curry(&mut planner);

        let outcome = planner
            .save_meal(date(2024, 3, 3), MealSlot::Lunch, meal(" rice and curry ", "rice, dhal"))
            .unwrap();

        assert!(matches!(outcome, SaveOutcome::Blocked(_)));
        assert!(planner.meals().day(date(2024, 3, 3)).is_none());
        assert!(planner.grocery().find_by_name("dhal").is_none());
        assert_eq!(planner.pending().unwrap().date, date(2024, 3, 3));
    }

    #[test]
    fn test_other_meal_or_slot_proceeds() {
        let mut planner = planner();
        plan_rice_and_curry(&mut planner);

        let day = date(2024, 3, 3);
        let other = planner
            .save_meal(day, MealSlot::Lunch, meal("Dhal Curry", "dhal"))
            .unwrap();
        let dinner = planner
            .save_meal(day, MealSlot::Dinner, meal("Rice and Curry", "rice"))
            .unwrap();

        assert_eq!(other, SaveOutcome::Saved);
        assert_eq!(dinner, SaveOutcome::Saved);
        assert!(planner.pending().is_none());
    }

    #[test]
    fn test_confirm_applies_held_meal() {
        let mut planner = planner();
        plan_rice_and_curry(&mut planner);
        planner
            .save_meal(date(2024, 3, 3), MealSlot::Lunch, meal("Rice and Curry", "rice, dhal"))
            .unwrap();

        let warning = planner.confirm_repetition().unwrap();

        let meals = planner.meals();
        assert_eq!(meals.meal(date(2024, 3, 3), MealSlot::Lunch), Some(&warning.meal));
        assert!(planner.grocery().find_by_name("dhal").is_some());
        assert!(planner.pending().is_none());
        assert_eq!(
            planner.confirm_repetition(),
            Err(PlannerError::NothingPending)
        );
    }

    #[test]
    fn test_cancel_discards_held_meal() {
        let mut planner = planner();
        plan_rice_and_curry(&mut planner);
        let day = date(2024, 3, 3);
        planner
            .save_meal(day, MealSlot::Lunch, meal("Rice and Curry", "rice"))
            .unwrap();

        assert!(planner.cancel_repetition().is_some());
        assert!(planner.pending().is_none());
        assert!(planner.meals().day(date(2024, 3, 3)).is_none());
        assert!(planner.cancel_repetition().is_none());
    }

    #[test]
    fn test_new_held_write_replaces_pending() {
        let mut planner = planner();
        plan_rice_and_curry(&mut planner);
        let day = date(2024, 3, 3);
        planner
            .save_meal(day, MealSlot::Lunch, meal("Rice and Curry", "rice"))
            .unwrap();
        planner
            .save_meal(day, MealSlot::Lunch, meal("rice and curry", "rice, egg"))
            .unwrap();

        assert_eq!(planner.pending().unwrap().meal.ingredients, "rice, egg");
    }

    #[test]
    fn test_add_suggested_meal() {
        let mut planner = planner();
        let suggestion = MealSuggestion {
            name: "Kottu".to_string(),
            ingredients: "roti, leek, egg".to_string(),
        };

        let outcome = planner
            .add_suggested_meal(date(2024, 5, 1), MealSlot::Dinner, &suggestion)
            .unwrap();

        assert_eq!(outcome, SaveOutcome::Saved);
        assert_eq!(
            planner.meals().meal(date(2024, 5, 1), MealSlot::Dinner).unwrap().name,
            "Kottu"
        );
    }

    #[test]
    fn test_add_suggested_meal_requires_ingredients() {
        let mut planner = planner();
        let suggestion = MealSuggestion {
            name: "Kottu".to_string(),
            ingredients: "  ".to_string(),
        };

        assert_eq!(
            planner.add_suggested_meal(date(2024, 5, 1), MealSlot::Dinner, &suggestion),
            Err(PlannerError::MissingIngredients("Kottu".to_string()))
        );
        assert!(planner.meals().is_empty());
    }

    #[test]
    fn test_manual_grocery_operations() {
        let mut planner = planner();
        planner.add_grocery_item(" Milk ");
        planner.add_grocery_item("milk");
        planner.add_grocery_item("");
        assert_eq!(grocery_names(&planner), vec!["Milk"]);

        let id = planner.grocery().find_by_name("milk").unwrap().id;
        planner.toggle_grocery_item(id);
        assert_eq!(planner.grocery().checked_count(), 1);

        planner.remove_grocery_item(id);
        assert!(planner.grocery().is_empty());
    }

    #[test]
    fn test_manual_item_pruned_on_next_meal_change() {
        let mut planner = planner();
        planner.add_grocery_item("milk");
        planner.save_meal(date(2024, 1, 1), MealSlot::Lunch, meal("Pasta", "pasta")).unwrap();
        assert_eq!(grocery_names(&planner), vec!["pasta"]);
    }

    #[test]
    fn test_state_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        let mut planner = Planner::load(Arc::clone(&store));
        planner.save_meal(date(2024, 1, 1), MealSlot::Lunch, meal("Pasta", "pasta")).unwrap();
        planner.add_grocery_item("milk");
        planner.set_diet_preference(DietPreference::Vegan);

        let reloaded = Planner::load(store);
        assert_eq!(*reloaded.meals(), *planner.meals());
        assert_eq!(*reloaded.grocery(), *planner.grocery());
        assert_eq!(reloaded.diet(), DietPreference::Vegan);
    }

    #[test]
    fn test_external_change_replaces_state() {
        let mut planner = planner();
        planner.save_meal(date(2024, 1, 1), MealSlot::Lunch, meal("Pasta", "pasta")).unwrap();

        let other = GroceryList::new().add_item("bread");
        let event = StorageEvent {
            key: StoreKey::Grocery,
            new_value: Some(serde_json::to_string(&other).unwrap()),
        };

        assert!(planner.apply_external_change(&event));
        assert_eq!(*planner.grocery(), other);
        assert_eq!(planner.meals().len(), 1);

        let diet = StorageEvent {
            key: StoreKey::DietPreference,
            new_value: Some("4".to_string()),
        };
        assert!(planner.apply_external_change(&diet));
        assert_eq!(planner.diet(), DietPreference::Carnivore);
    }

    #[test]
    fn test_external_change_ignores_removed_or_corrupt_values() {
        let mut planner = planner();
        planner.save_meal(date(2024, 1, 1), MealSlot::Lunch, meal("Pasta", "pasta")).unwrap();
        let before = planner.meals();

        let removed = StorageEvent {
            key: StoreKey::Meals,
            new_value: None,
        };
        let corrupt = StorageEvent {
            key: StoreKey::Meals,
            new_value: Some("{oops".to_string()),
        };

        assert!(!planner.apply_external_change(&removed));
        assert!(!planner.apply_external_change(&corrupt));
        assert_eq!(*planner.meals(), *before);
    }

    #[test]
    fn test_external_meals_reach_second_planner() {
        let temp_dir = TempDir::new().unwrap();
        let mut first = Planner::load(FileStore::new(temp_dir.path().to_path_buf()));
        let watcher = FileStore::new(temp_dir.path().to_path_buf());
        watcher.prime().unwrap();
        let mut second = Planner::load(watcher);

        first.save_meal(date(2024, 1, 1), MealSlot::Dinner, meal("Soup", "leek")).unwrap();

        let events = second.store().poll_changes();
        assert_eq!(events.len(), 2);
        for event in &events {
            assert!(second.apply_external_change(event));
        }
        assert_eq!(*second.meals(), *first.meals());
        assert_eq!(*second.grocery(), *first.grocery());
        assert!(first.store().poll_changes().is_empty());
    }
}
