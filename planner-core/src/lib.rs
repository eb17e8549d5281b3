//! Meal Planner Core Library
//!
//! Meal calendar, grocery reconciliation, repetition guard, local
//! persistence and AI assistance for the two-person meal planner.

pub mod ai;
pub mod calendar;
pub mod error;
pub mod guard;
pub mod models;
pub mod planner;
pub mod reconcile;
pub mod storage;
pub mod store;

pub use ai::{Assistant, GeminiBackend, GeminiConfig, MealSuggestion, RecipeDetails};
pub use error::PlannerError;
pub use guard::{GuardDecision, RepetitionWarning};
pub use models::{DayRecord, DietPreference, GroceryItem, GroceryList, Meal, MealSlot};
pub use planner::{Planner, SaveOutcome};
pub use reconcile::reconcile;
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, PersistenceAdapter, StorageError, StorageEvent,
    StoreKey, Subscription,
};
pub use store::MealStore;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
