//! Raw key-value store abstraction.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::StoreKey;

/// A local store holding one serialized string per key.
pub trait KeyValueStore {
    /// Returns `Ok(None)` if the key has never been written.
    fn get(&self, key: StoreKey) -> Result<Option<String>, StorageError>;

    fn set(&self, key: StoreKey, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Errors that can occur while reading or writing stored values.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize {key}: {source}")]
    Serialize {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory store, shared between handles through `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key, value.to_string());
        Ok(())
    }
}
