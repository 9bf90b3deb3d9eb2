//! Key-value store abstraction for the Markbase content repository.
//!
//! This crate provides a [`Store`] trait for abstracting document storage
//! from the underlying backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (in-memory, JSON file, future remote stores)
//! - **Clean separation** between repository logic and I/O operations
//!
//! # Atomic updates
//!
//! Beyond plain `get`/`create`/`remove`, the trait exposes
//! [`Store::update`]: a read-modify-write applied through a mutator
//! callback. The store guarantees the whole read-check-write sequence is
//! observed atomically by every other caller — no caller ever sees a
//! half-applied document, and two racing updates are serialized. Mutators
//! may be re-invoked by a backend that retries on conflict, so they must be
//! re-entrant. A mutator rejects a mutation by returning a
//! [`MutationAbort`], which the store surfaces as a
//! [`StoreErrorKind::Aborted`] error carrying the typed cause.
//!
//! # Example
//!
//! ```ignore
//! use mb_store::{MemoryStore, Store};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.create("content", json!({}))?;
//! store.update("content", &mut |current| {
//!     let mut next = current.cloned().unwrap_or_else(|| json!({}));
//!     next["hello"] = json!("world");
//!     Ok(next)
//! })?;
//! ```

mod file;
mod memory;
mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{ErrorStatus, MutationAbort, Mutator, Store, StoreError, StoreErrorKind};
