//! Date keys and calendar ranges.
//!
//! The meal store is keyed by local calendar day. Timestamps are reduced to
//! a `NaiveDate` in their own timezone, so two instants on the same local
//! day always produce the same key.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};

/// Canonical key format (`YYYY-MM-DD`).
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Reduces a timestamp to its calendar day in the timestamp's timezone.
pub fn date_key<Tz: TimeZone>(at: &DateTime<Tz>) -> NaiveDate {
    at.date_naive()
}

/// Today in the local timezone.
pub fn today() -> NaiveDate {
    date_key(&Local::now())
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", s))
}

/// The `count` calendar days before `date`, nearest first.
pub fn previous_days(date: NaiveDate, count: u64) -> Vec<NaiveDate> {
    (1..=count)
        .filter_map(|n| date.checked_sub_days(Days::new(n)))
        .collect()
}

/// First day of the month `delta` months away from `date`'s month.
pub fn shift_month(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + delta;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

/// Every date shown in a month view: whole weeks from the Sunday on or
/// before the 1st through the Saturday on or after the last day.
pub fn calendar_dates(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = shift_month(first, 1)?.pred_opt()?;

    let lead = first.weekday().num_days_from_sunday() as u64;
    let trail = 6 - last.weekday().num_days_from_sunday() as u64;
    let start = first.checked_sub_days(Days::new(lead))?;
    let end = last.checked_add_days(Days::new(trail))?;

    Some(start.iter_days().take_while(|d| *d <= end).collect())
}
