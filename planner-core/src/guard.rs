//! Repetition guard for meal writes.
//!
//! Writing the same meal into the same slot for a third day in a row needs
//! explicit confirmation. The guard only inspects the store; it never
//! mutates it.

use chrono::NaiveDate;

use crate::calendar::previous_days;
use crate::models::{Meal, MealSlot};
use crate::store::MealStore;

/// Number of earlier days that must already hold the same meal.
const REPEAT_WINDOW: u64 = 2;

/// A meal write held back until the user confirms or cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepetitionWarning {
    pub date: NaiveDate,
    pub slot: MealSlot,
    pub meal: Meal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Blocked(RepetitionWarning),
}

/// Decides whether `meal` may be written to `slot` on `date` right away.
pub fn check(store: &MealStore, date: NaiveDate, slot: MealSlot, meal: &Meal) -> GuardDecision {
    let candidate = meal.comparable_name();
    let prior = previous_days(date, REPEAT_WINDOW);

    let repeated = prior.len() as u64 == REPEAT_WINDOW
        && store
            .meals_for_slot_across_dates(slot, &prior)
            .into_iter()
            .all(|found| found.is_some_and(|m| m.comparable_name() == candidate));

    if repeated {
        tracing::debug!("Blocked repeat of '{}' for {} on {}", meal.name, slot, date);
        GuardDecision::Blocked(RepetitionWarning {
            date,
            slot,
            meal: meal.clone(),
        })
    } else {
        GuardDecision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn meal(name: &str) -> Meal {
        Meal::new(name, "rice, curry leaves").unwrap()
    }

    fn two_days_of_curry() -> MealStore {
        MealStore::new()
            .set_meal(ymd(2024, 1, 8), MealSlot::Lunch, meal("Rice and Curry"))
            .set_meal(ymd(2024, 1, 9), MealSlot::Lunch, meal("Rice and Curry"))
    }

    #[test]
    fn test_third_day_is_blocked() {
        let store = two_days_of_curry();
        let candidate = meal("Rice and Curry");

        match check(&store, ymd(2024, 1, 10), MealSlot::Lunch, &candidate) {
            GuardDecision::Blocked(warning) => {
                assert_eq!(warning.date, ymd(2024, 1, 10));
                assert_eq!(warning.slot, MealSlot::Lunch);
                assert_eq!(warning.meal, candidate);
            }
            GuardDecision::Proceed => panic!("expected repetition to be blocked"),
        }
    }

    #[test]
    fn test_name_match_ignores_case_and_whitespace() {
        let store = two_days_of_curry();
        let decision = check(
            &store,
            ymd(2024, 1, 10),
            MealSlot::Lunch,
            &meal("  RICE AND curry "),
        );
        assert!(matches!(decision, GuardDecision::Blocked(_)));
    }

    #[test]
    fn test_different_meal_proceeds() {
        let store = two_days_of_curry();
        let decision = check(&store, ymd(2024, 1, 10), MealSlot::Lunch, &meal("Dhal Curry"));
        assert_eq!(decision, GuardDecision::Proceed);
    }

    #[test]
    fn test_other_slot_proceeds() {
        let store = two_days_of_curry();
        let decision = check(
            &store,
            ymd(2024, 1, 10),
            MealSlot::Dinner,
            &meal("Rice and Curry"),
        );
        assert_eq!(decision, GuardDecision::Proceed);
    }

    #[test]
    fn test_gap_day_proceeds() {
        let store = MealStore::new()
            .set_meal(ymd(2024, 1, 8), MealSlot::Lunch, meal("Rice and Curry"))
            .toggle_eating_out(ymd(2024, 1, 9));
        let decision = check(
            &store,
            ymd(2024, 1, 10),
            MealSlot::Lunch,
            &meal("Rice and Curry"),
        );
        assert_eq!(decision, GuardDecision::Proceed);
    }

    #[test]
    fn test_only_one_prior_day_proceeds() {
        let store =
            MealStore::new().set_meal(ymd(2024, 1, 9), MealSlot::Lunch, meal("Rice and Curry"));
        let decision = check(
            &store,
            ymd(2024, 1, 10),
            MealSlot::Lunch,
            &meal("Rice and Curry"),
        );
        assert_eq!(decision, GuardDecision::Proceed);
    }

    #[test]
    fn test_window_crosses_month_boundary() {
        let store = MealStore::new()
            .set_meal(ymd(2024, 1, 31), MealSlot::Dinner, meal("Kottu"))
            .set_meal(ymd(2024, 2, 1), MealSlot::Dinner, meal("Kottu"));
        let decision = check(&store, ymd(2024, 2, 2), MealSlot::Dinner, &meal("kottu"));
        assert!(matches!(decision, GuardDecision::Blocked(_)));
    }

    #[test]
    fn test_guard_never_mutates_store() {
        let store = two_days_of_curry();
        let before = store.clone();
        let _ = check(
            &store,
            ymd(2024, 1, 10),
            MealSlot::Lunch,
            &meal("Rice and Curry"),
        );
        assert_eq!(store, before);
    }
}
