//! Update coordinator.
//!
//! Orchestrates the optimistic-concurrency update protocol: process the
//! incoming markdown, derive its route, apply a guarded atomic mutation
//! against the repository, and translate every failure into a structured
//! [`UpdateError`] the caller can branch on.

use std::sync::Arc;

use mb_renderer::{ContentProcessor, ProcessError};
use mb_store::StoreErrorKind;

use crate::record::ContentRecord;
use crate::repository::ContentRepository;
use crate::route::normalize_route;

/// Structured error from the update protocol.
///
/// Produced as a value, never panicked across the coordinator boundary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    /// Submitted content has no `route` attribute.
    #[error("submitted content has no route attribute")]
    MissingRoute,

    /// The stored content diverged from the caller's expected prior state.
    #[error("stored content has changed since it was read")]
    Changed,

    /// The frontmatter block is malformed.
    #[error("malformed frontmatter: {0}")]
    Malformed(String),

    /// The markdown pipeline failed.
    #[error("markdown rendering failed: {0}")]
    Render(String),

    /// Catch-all for unexpected failures inside the mutation.
    #[error("{0}")]
    Unknown(String),
}

impl UpdateError {
    /// Wire code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRoute => "CONTENT_MISSING_FIELD",
            Self::Changed => "CONTENT_HAS_CHANGED",
            Self::Malformed(_) => "MALFORMED_CONTENT",
            Self::Render(_) => "RENDER_FAILURE",
            Self::Unknown(_) => "UNKNOWN_ERROR",
        }
    }
}

impl From<ProcessError> for UpdateError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Frontmatter(message) => Self::Malformed(message),
            ProcessError::Render(message) => Self::Render(message),
        }
    }
}

/// Coordinator for the content update protocol.
pub struct UpdateCoordinator {
    processor: Arc<ContentProcessor>,
    repository: Arc<ContentRepository>,
}

impl UpdateCoordinator {
    /// Create a coordinator over a shared processor and repository.
    #[must_use]
    pub fn new(processor: Arc<ContentProcessor>, repository: Arc<ContentRepository>) -> Self {
        Self {
            processor,
            repository,
        }
    }

    /// Apply an edit to the content collection.
    ///
    /// Processes `new_content`, derives the storage key from its declared
    /// route, and commits the record through a single atomic mutation.
    /// With `expected_prior_raw` set, the commit only succeeds if the
    /// stored record's `raw` still equals the expectation — a missing
    /// record also counts as changed. `None` skips the check entirely
    /// (create, or deliberate conflict override).
    ///
    /// On success callers needing the stored record re-fetch it via
    /// [`ContentRepository::find_by_route`].
    ///
    /// # Errors
    ///
    /// Returns a structured [`UpdateError`]; the collection is unchanged
    /// on every error path.
    pub fn update(
        &self,
        new_content: &str,
        expected_prior_raw: Option<&str>,
    ) -> Result<(), UpdateError> {
        let record = ContentRecord::from(self.processor.process(new_content)?);

        // The mutation may be retried by the store; every check runs
        // against the collection state it is handed.
        let result = self.repository.mutate(|collection| {
            // The route is only known after parsing, so the missing-field
            // check lives inside the atomic step with the other guards.
            let route = record.route().ok_or(UpdateError::MissingRoute)?;
            let key = normalize_route(route);

            if let Some(expected) = expected_prior_raw {
                match collection.get(&key) {
                    Some(existing) if existing.raw == expected => {}
                    _ => return Err(UpdateError::Changed),
                }
            }

            collection.insert(key, record.clone());
            Ok(())
        });

        match result {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == StoreErrorKind::Aborted => {
                match err.downcast_source::<UpdateError>() {
                    Some(update_err) => Err(update_err.clone()),
                    None => Err(UpdateError::Unknown(err.to_string())),
                }
            }
            Err(err) => Err(UpdateError::Unknown(err.to_string())),
        }
    }
}
