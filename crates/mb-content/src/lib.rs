//! Content repository and update protocol for Markbase.
//!
//! This crate owns the single logical document collection: markdown
//! records keyed by normalized route, stored as one JSON document in a
//! [`Store`](mb_store::Store) backend.
//!
//! # Architecture
//!
//! - [`normalize_route`] — canonical storage key derivation
//! - [`ContentRecord`] / [`ContentCollection`] — the data model
//! - [`ContentRepository`] — load (with lazy initialization), point lookup
//!   by route, metadata listing
//! - [`UpdateCoordinator`] — the optimistic-concurrency update protocol:
//!   parse, derive route, guarded atomic mutation, structured errors
//!
//! # Concurrency
//!
//! All writes go through a single atomic read-check-write against the
//! store. When two updates race on the same prior state, at most one
//! commits; the other observes [`UpdateError::Changed`]. Reads are served
//! from the latest committed snapshot without extra locking.

mod coordinator;
mod record;
mod repository;
mod route;

pub use mb_renderer::Attributes;

pub use coordinator::{UpdateCoordinator, UpdateError};
pub use record::{ContentCollection, ContentRecord};
pub use repository::{COLLECTION_KEY, ContentRepository, RepositoryError};
pub use route::normalize_route;
