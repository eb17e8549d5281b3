//! File-backed key-value store with change notification.
//!
//! Each key lives in `<data_dir>/<key>.json`. Writes go to a temporary file
//! that is renamed into place, so a reader in another process never sees a
//! half-written value.
//!
//! Every handle remembers a SHA-256 fingerprint of each value it has read or
//! written. A watcher polls the directory and reports keys whose content no
//! longer matches, which means another process wrote them. Clones share the
//! fingerprints, so writes made through any clone are never reported back.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{KeyValueStore, StorageError, StorageEvent, StoreKey};

/// Default polling interval for [`FileStore::watch`].
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_millis(500);

/// `None` records that the file was absent.
type Fingerprints = HashMap<StoreKey, Option<Vec<u8>>>;

#[derive(Clone, Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    seen: Arc<Mutex<Fingerprints>>,
}

impl FileStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            seen: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: StoreKey) -> PathBuf {
        self.data_dir.join(key.filename())
    }

    pub fn exists(&self, key: StoreKey) -> bool {
        self.path(key).exists()
    }

    fn seen(&self) -> MutexGuard<'_, Fingerprints> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read_raw(&self, key: StoreKey) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io { path, source: e }),
        }
    }

    /// Records the current on-disk state of every key this handle has not
    /// seen yet, so the first poll only reports later changes.
    pub fn prime(&self) -> Result<(), StorageError> {
        let mut seen = self.seen();
        for key in StoreKey::ALL {
            if !seen.contains_key(&key) {
                let current = self.read_raw(key)?.map(|bytes| fingerprint(&bytes));
                seen.insert(key, current);
            }
        }
        Ok(())
    }

    /// Returns an event for every key changed since this handle last saw it.
    pub fn poll_changes(&self) -> Vec<StorageEvent> {
        let mut seen = self.seen();
        let mut events = Vec::new();

        for key in StoreKey::ALL {
            let bytes = match self.read_raw(key) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Failed to poll {}: {}", key, e);
                    continue;
                }
            };
            let current = bytes.as_deref().map(fingerprint);
            if seen.get(&key) == Some(&current) {
                continue;
            }
            seen.insert(key, current);

            let new_value = bytes.map(|b| String::from_utf8_lossy(&b).into_owned());
            tracing::debug!("Detected external change to {}", key);
            events.push(StorageEvent { key, new_value });
        }

        events
    }

    /// Starts polling for changes made by other processes.
    ///
    /// Must be called from within a Tokio runtime. Polling stops when the
    /// returned subscription is dropped.
    pub fn watch(&self, interval: Duration) -> Result<Subscription, StorageError> {
        self.prime()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let store = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                for event in store.poll_changes() {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok(Subscription { events: rx, handle })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        let mut seen = self.seen();
        let bytes = self.read_raw(key)?;
        seen.insert(key, bytes.as_deref().map(fingerprint));
        Ok(bytes.map(|b| String::from_utf8_lossy(&b).into_owned()))
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<(), StorageError> {
        // Held across the write so a concurrent poll cannot report our own
        // value as an external change.
        let mut seen = self.seen();

        fs::create_dir_all(&self.data_dir).map_err(|e| StorageError::Io {
            path: self.data_dir.clone(),
            source: e,
        })?;

        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StorageError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Io {
            path: path.clone(),
            source: e,
        })?;

        seen.insert(key, Some(fingerprint(value.as_bytes())));
        Ok(())
    }
}

/// A live change subscription. Dropping it stops the watcher task.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::UnboundedReceiver<StorageEvent>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Waits for the next external change.
    pub async fn next(&mut self) -> Option<StorageEvent> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn fingerprint(bytes: &[u8]) -> Vec<u8> {
    Sha256::digest(bytes).to_vec()
}
