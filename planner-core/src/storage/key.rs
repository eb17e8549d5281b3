//! Keys of the persisted state.

use std::fmt;

/// Each piece of planner state is stored under its own key and is always
/// read and written as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Meals,
    Grocery,
    DietPreference,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::Meals, StoreKey::Grocery, StoreKey::DietPreference];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Meals => "meals",
            StoreKey::Grocery => "grocery",
            StoreKey::DietPreference => "dietPreference",
        }
    }

    /// Returns the filename used by the file-backed store.
    pub fn filename(&self) -> &'static str {
        match self {
            StoreKey::Meals => "meals.json",
            StoreKey::Grocery => "grocery.json",
            StoreKey::DietPreference => "dietPreference.json",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A change to one key made outside this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: StoreKey,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
}
