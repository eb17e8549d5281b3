//! Grocery list reconciliation.
//!
//! The grocery list is derived from the meal store: every ingredient of every
//! meal on a day that is not marked eating out is required. Reconciling keeps
//! the previous items that are still required (with their checked state and
//! ids), drops the rest, and appends unchecked items for required names that
//! were not listed yet.
//!
//! Items are matched purely by lower-cased name. There is no record of
//! whether an item was added by hand, so a manual item is kept only while it
//! matches a required ingredient.

use std::collections::HashSet;

use crate::models::{GroceryItem, GroceryList};
use crate::store::MealStore;

/// Splits a free-text ingredient list into lower-cased names.
pub fn split_ingredients(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(',')
        .map(|fragment| fragment.trim().to_lowercase())
        .filter(|fragment| !fragment.is_empty())
}

/// Required ingredient names, deduplicated, in first-seen order
/// (ascending date, lunch before dinner).
pub fn required_ingredients(store: &MealStore) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut required = Vec::new();

    for (_, record) in store.iter().filter(|(_, r)| !r.is_eating_out) {
        for (_, meal) in record.meals() {
            for name in split_ingredients(&meal.ingredients) {
                if seen.insert(name.clone()) {
                    required.push(name);
                }
            }
        }
    }

    required
}

/// Rebuilds the grocery list for `store`, preserving state from `previous`.
pub fn reconcile(store: &MealStore, previous: &GroceryList) -> GroceryList {
    let required = required_ingredients(store);
    let required_set: HashSet<&str> = required.iter().map(String::as_str).collect();

    let kept: Vec<GroceryItem> = previous
        .iter()
        .filter(|item| required_set.contains(item.key().as_str()))
        .cloned()
        .collect();

    let covered: HashSet<String> = kept.iter().map(GroceryItem::key).collect();
    let added = required
        .into_iter()
        .filter(|name| !covered.contains(name))
        .map(GroceryItem::new);

    let items: Vec<GroceryItem> = kept.into_iter().chain(added).collect();
    tracing::debug!(
        "Reconciled grocery list: {} -> {} item(s)",
        previous.len(),
        items.len()
    );
    GroceryList::from_items(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Meal, MealSlot};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn names(list: &GroceryList) -> Vec<&str> {
        list.iter().map(|i| i.name.as_str()).collect()
    }

    fn pasta_store() -> MealStore {
        MealStore::new().set_meal(
            ymd(2024, 1, 1),
            MealSlot::Lunch,
            Meal::new("Pasta", "pasta, tomato, basil").unwrap(),
        )
    }

    #[test]
    fn test_split_ingredients() {
        let parts: Vec<String> = split_ingredients(" Flour, ,EGGS ,  milk,").collect();
        assert_eq!(parts, vec!["flour", "eggs", "milk"]);
    }

    #[test]
    fn test_pasta_scenario() {
        let list = reconcile(&pasta_store(), &GroceryList::new());

        assert_eq!(names(&list), vec!["pasta", "tomato", "basil"]);
        assert!(list.iter().all(|i| !i.checked));
    }

    #[test]
    fn test_eating_out_excluded() {
        let store = pasta_store().toggle_eating_out(ymd(2024, 1, 1));
        let list = reconcile(&store, &GroceryList::new());

        assert!(list.is_empty());
        assert!(store.meal(ymd(2024, 1, 1), MealSlot::Lunch).is_some());
    }

    #[test]
    fn test_duplicates_collapse_case_insensitively() {
        let store = pasta_store().set_meal(
            ymd(2024, 1, 2),
            MealSlot::Dinner,
            Meal::new("Bruschetta", "Tomato, bread, BASIL").unwrap(),
        );
        let list = reconcile(&store, &GroceryList::new());

        assert_eq!(names(&list), vec!["pasta", "tomato", "basil", "bread"]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let store = pasta_store();
        let once = reconcile(&store, &GroceryList::new());
        let twice = reconcile(&store, &once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_checked_state_preserved() {
        let store = pasta_store();
        let list = reconcile(&store, &GroceryList::new());
        let tomato = list.find_by_name("tomato").unwrap().id;
        let list = list.toggle_item(tomato);

        let changed = store.set_meal(
            ymd(2024, 1, 3),
            MealSlot::Dinner,
            Meal::new("Salad", "tomato, lettuce").unwrap(),
        );
        let after = reconcile(&changed, &list);

        let item = after.find_by_name("tomato").unwrap();
        assert!(item.checked);
        assert_eq!(item.id, tomato);
    }

    #[test]
    fn test_unrequired_items_pruned() {
        let date = ymd(2024, 1, 1);
        let store = MealStore::new().set_meal(
            date,
            MealSlot::Lunch,
            Meal::new("Pancakes", "flour, eggs").unwrap(),
        );
        let list = reconcile(&store, &GroceryList::new());
        assert!(list.find_by_name("flour").is_some());

        let changed = store.set_meal(
            date,
            MealSlot::Lunch,
            Meal::new("Omelette", "eggs").unwrap(),
        );
        let after = reconcile(&changed, &list);

        assert!(after.find_by_name("flour").is_none());
        assert_eq!(names(&after), vec!["eggs"]);
    }

    #[test]
    fn test_kept_items_before_new_items() {
        let store = pasta_store();
        let previous = GroceryList::new().add_item("Basil");
        let list = reconcile(&store, &previous);

        assert_eq!(names(&list), vec!["Basil", "pasta", "tomato"]);
    }

    #[test]
    fn test_manual_item_not_matching_is_dropped() {
        let previous = GroceryList::new().add_item("Paper towels");
        let list = reconcile(&pasta_store(), &previous);

        assert!(list.find_by_name("paper towels").is_none());
    }
}
