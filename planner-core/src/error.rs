//! Planner error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by planner operations.
///
/// Only input validation reaches the caller; storage and AI failures are
/// recovered inside the planner and logged instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Meal name cannot be empty")]
    EmptyMealName,

    #[error("Suggested meal '{0}' has no ingredients to add")]
    MissingIngredients(String),

    #[error("Eating out on {0}; meals for that day cannot be changed")]
    EatingOut(NaiveDate),

    #[error("No repetition warning is pending")]
    NothingPending,
}
