//! Copy-on-write meal store.
//!
//! A `MealStore` maps calendar days to their `DayRecord`. Mutating methods
//! return a new store and never modify the receiver, so any snapshot handed
//! out (usually as `Arc<MealStore>`) stays valid while newer versions are
//! built. Records are shared between versions with `Arc`, which keeps each
//! mutation to one map copy plus one new record.
//!
//! Empty records (no meals, not eating out) are pruned on every mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{DayRecord, Meal, MealSlot};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(NaiveDate, DayRecord)>", into = "Vec<(NaiveDate, DayRecord)>")]
pub struct MealStore {
    days: BTreeMap<NaiveDate, Arc<DayRecord>>,
}

impl MealStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date).map(Arc::as_ref)
    }

    pub fn meal(&self, date: NaiveDate, slot: MealSlot) -> Option<&Meal> {
        self.day(date).and_then(|d| d.meal(slot))
    }

    /// Records in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &DayRecord)> {
        self.days.iter().map(|(date, record)| (*date, record.as_ref()))
    }

    /// Records with `from <= date <= to`.
    pub fn days_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = (NaiveDate, &DayRecord)> {
        self.days
            .range(from..=to)
            .map(|(date, record)| (*date, record.as_ref()))
    }

    /// The meal in `slot` for each of `dates`, in request order.
    pub fn meals_for_slot_across_dates(
        &self,
        slot: MealSlot,
        dates: &[NaiveDate],
    ) -> Vec<Option<&Meal>> {
        dates.iter().map(|date| self.meal(*date, slot)).collect()
    }

    /// Places `meal` in `slot` on `date`, replacing what was there.
    #[must_use]
    pub fn set_meal(&self, date: NaiveDate, slot: MealSlot, meal: Meal) -> Self {
        let record = self
            .day(date)
            .cloned()
            .unwrap_or_default()
            .with_meal(slot, meal);
        self.with_record(date, record)
    }

    /// Clears `slot` on `date`. Missing records are left alone.
    #[must_use]
    pub fn delete_meal(&self, date: NaiveDate, slot: MealSlot) -> Self {
        match self.day(date) {
            Some(record) => self.with_record(date, record.without_meal(slot)),
            None => self.clone(),
        }
    }

    /// Flips the eating-out flag on `date`, creating the record if needed.
    #[must_use]
    pub fn toggle_eating_out(&self, date: NaiveDate) -> Self {
        let record = self
            .day(date)
            .cloned()
            .unwrap_or_default()
            .toggled_eating_out();
        self.with_record(date, record)
    }

    fn with_record(&self, date: NaiveDate, record: DayRecord) -> Self {
        let mut days = self.days.clone();
        if record.is_empty() {
            days.remove(&date);
        } else {
            days.insert(date, Arc::new(record));
        }
        Self { days }
    }
}

impl From<Vec<(NaiveDate, DayRecord)>> for MealStore {
    fn from(entries: Vec<(NaiveDate, DayRecord)>) -> Self {
        let days = entries
            .into_iter()
            .filter(|(_, record)| !record.is_empty())
            .map(|(date, record)| (date, Arc::new(record)))
            .collect();
        Self { days }
    }
}

impl From<MealStore> for Vec<(NaiveDate, DayRecord)> {
    fn from(store: MealStore) -> Self {
        store
            .days
            .into_iter()
            .map(|(date, record)| (date, Arc::unwrap_or_clone(record)))
            .collect()
    }
}
