//! In-memory store implementation.
//!
//! Provides [`MemoryStore`] for testing and ephemeral serving.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::store::{Mutator, Store, StoreError, StoreErrorKind};

/// In-memory [`Store`] backed by a mutex-guarded map.
///
/// All operations take the same lock, so updates are trivially serialized:
/// the mutator runs with the lock held and its result is committed before
/// any other caller can observe the key.
///
/// # Example
///
/// ```ignore
/// use mb_store::{MemoryStore, Store};
/// use serde_json::json;
///
/// let store = MemoryStore::new().with_entry("content", json!({}));
/// let value = store.get("content")?;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, replacing any existing value.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, value: Value) -> Self {
        self.entries.lock().unwrap().insert(key.into(), value);
        self
    }

    /// Number of stored documents.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no documents.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Value, StoreError> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key).with_backend("Memory"))
    }

    fn create(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(key) {
            return Err(StoreError::new(StoreErrorKind::AlreadyExists)
                .with_key(key)
                .with_backend("Memory"));
        }
        entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(key).with_backend("Memory"))
    }

    fn update(&self, key: &str, mutate: &mut Mutator<'_>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        match mutate(entries.get(key)) {
            Ok(next) => {
                entries.insert(key.to_owned(), next);
                Ok(())
            }
            Err(abort) => Err(StoreError::aborted(abort)
                .with_key(key)
                .with_backend("Memory")),
        }
    }
}
