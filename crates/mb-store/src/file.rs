//! JSON-file store implementation.
//!
//! [`FileStore`] persists all documents in a single JSON file:
//!
//! ```text
//! {
//!   "content": { ... },
//!   "other-key": { ... }
//! }
//! ```
//!
//! Writes go through a temporary file in the same directory followed by a
//! rename, so a crash mid-write never leaves a torn document behind. A
//! process-wide mutex serializes every operation; the mutator for
//! [`Store::update`] runs with the lock held, between the read and the
//! committed write.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Value;

use crate::store::{Mutator, Store, StoreError, StoreErrorKind};

/// File-backed [`Store`] rooted at a single JSON file.
///
/// The file is created on first write; a missing file reads as an empty
/// store. Intra-process concurrency is handled by the internal mutex;
/// the store assumes it is the only writer of its file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by the JSON file at `path`.
    ///
    /// The file (and its parent directory) is created lazily on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read all entries from disk. A missing file is an empty store.
    fn read_entries(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(StoreError::io(err).with_backend("File")),
        };
        serde_json::from_slice(&bytes)
            .map_err(|err| StoreError::serialization(err).with_backend("File"))
    }

    /// Write all entries to disk via temp-file-and-rename.
    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(err).with_backend("File"))?;
        }

        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|err| StoreError::serialization(err).with_backend("File"))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).map_err(|err| StoreError::io(err).with_backend("File"))?;
        fs::rename(&tmp, &self.path).map_err(|err| StoreError::io(err).with_backend("File"))?;

        tracing::trace!(path = %self.path.display(), "store file written");
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Value, StoreError> {
        let _guard = self.lock.lock().unwrap();
        self.read_entries()?
            .remove(key)
            .ok_or_else(|| StoreError::not_found(key).with_backend("File"))
    }

    fn create(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.read_entries()?;
        if entries.contains_key(key) {
            return Err(StoreError::new(StoreErrorKind::AlreadyExists)
                .with_key(key)
                .with_backend("File"));
        }
        entries.insert(key.to_owned(), value);
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_none() {
            return Err(StoreError::not_found(key).with_backend("File"));
        }
        self.write_entries(&entries)
    }

    fn update(&self, key: &str, mutate: &mut Mutator<'_>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.read_entries()?;
        match mutate(entries.get(key)) {
            Ok(next) => {
                entries.insert(key.to_owned(), next);
                self.write_entries(&entries)
            }
            Err(abort) => Err(StoreError::aborted(abort)
                .with_key(key)
                .with_backend("File")),
        }
    }
}
