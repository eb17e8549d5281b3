//! Local persistence for planner state.
//!
//! # Layout
//!
//! Three keys, each holding one JSON value:
//! - `meals`: array of `[date, DayRecord]` pairs
//! - `grocery`: array of grocery items
//! - `dietPreference`: the preference ordinal
//!
//! The file-backed store keeps each key in `<data_dir>/<key>.json` and can
//! watch the directory for writes made by other processes.

mod adapter;
mod file_store;
mod key;
mod kv;

pub use adapter::{decode, PersistedState, PersistenceAdapter};
pub use file_store::{FileStore, Subscription, DEFAULT_WATCH_INTERVAL};
pub use key::{StorageEvent, StoreKey};
pub use kv::{KeyValueStore, MemoryStore, StorageError};
