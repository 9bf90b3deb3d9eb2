//! Content repository.
//!
//! Owns the canonical [`ContentCollection`]: one JSON document in the
//! backing store under a well-known key. Callers get owned decoded copies;
//! the only mutation path is the atomic [`mutate`](ContentRepository::mutate)
//! used by the update coordinator.

use std::sync::Arc;

use mb_store::{MutationAbort, Store, StoreError, StoreErrorKind};
use serde_json::Value;

use crate::record::{ContentCollection, ContentRecord};
use mb_renderer::Attributes;

/// Well-known store key for the content collection document.
pub const COLLECTION_KEY: &str = "content";

/// Error from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No record matched the normalized route.
    #[error("no content found for route: {0}")]
    RouteNotFound(String),

    /// The stored collection document could not be encoded or decoded.
    #[error("invalid content collection: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// Wire code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            Self::Serialization(_) | Self::Store(_) => "UNKNOWN_ERROR",
        }
    }
}

/// Repository over the single content collection.
pub struct ContentRepository {
    store: Arc<dyn Store>,
}

impl ContentRepository {
    /// Create a repository over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fetch the collection, lazily initializing it on first access.
    ///
    /// A missing collection document is created empty; a document that no
    /// longer decodes is treated as corrupt, removed, and re-created empty.
    /// Initialization is idempotent: the create is conditional, and the
    /// loser of a concurrent first-access race adopts the winner's
    /// collection instead of clobbering it.
    pub fn load(&self) -> Result<ContentCollection, RepositoryError> {
        match self.store.get(COLLECTION_KEY) {
            Ok(value) => match decode(value) {
                Ok(collection) => Ok(collection),
                Err(err) => {
                    tracing::warn!(error = %err, "stored collection is corrupt, reinitializing");
                    self.initialize()
                }
            },
            Err(err) if err.kind() == StoreErrorKind::NotFound => self.initialize(),
            Err(err) => Err(err.into()),
        }
    }

    /// Remove any stale entry, then create a fresh empty collection.
    fn initialize(&self) -> Result<ContentCollection, RepositoryError> {
        match self.store.remove(COLLECTION_KEY) {
            Ok(()) => {}
            Err(err) if err.kind() == StoreErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let empty = ContentCollection::default();
        match self.store.create(COLLECTION_KEY, serde_json::to_value(&empty)?) {
            Ok(()) => Ok(empty),
            Err(err) if err.kind() == StoreErrorKind::AlreadyExists => {
                // Lost the initialization race; the winner's collection is
                // authoritative.
                let value = self.store.get(COLLECTION_KEY)?;
                Ok(decode(value)?)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Look up a record whose declared route matches `route` (normalized).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::RouteNotFound`] if no record matches.
    pub fn find_by_route(&self, route: &str) -> Result<ContentRecord, RepositoryError> {
        let collection = self.load()?;
        collection
            .find_by_route(route)
            .cloned()
            .ok_or_else(|| RepositoryError::RouteNotFound(route.to_owned()))
    }

    /// Attributes of every stored record.
    pub fn list_meta(&self) -> Result<Vec<Attributes>, RepositoryError> {
        Ok(self.load()?.meta())
    }

    /// Apply a single atomic mutation to the stored collection.
    ///
    /// Decodes the current document (an absent document mutates an empty
    /// collection), runs `apply`, and commits the encoded result. `apply`
    /// may run more than once if the store retries on conflict; a typed
    /// error returned from it aborts the mutation, leaving the collection
    /// unchanged, and surfaces as [`StoreErrorKind::Aborted`] with the
    /// error as source.
    pub(crate) fn mutate<E, F>(&self, mut apply: F) -> Result<(), StoreError>
    where
        E: std::error::Error + Send + Sync + 'static,
        F: FnMut(&mut ContentCollection) -> Result<(), E>,
    {
        let mut mutator = |current: Option<&Value>| -> Result<Value, MutationAbort> {
            let mut collection = match current {
                None => ContentCollection::default(),
                Some(value) => decode(value.clone()).map_err(MutationAbort::new)?,
            };
            apply(&mut collection).map_err(MutationAbort::new)?;
            serde_json::to_value(&collection).map_err(MutationAbort::new)
        };
        self.store.update(COLLECTION_KEY, &mut mutator)
    }
}

/// Decode a stored collection document.
fn decode(value: Value) -> Result<ContentCollection, serde_json::Error> {
    serde_json::from_value(value)
}
