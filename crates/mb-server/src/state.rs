//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use mb_content::{ContentRepository, UpdateCoordinator};
use mb_renderer::ContentProcessor;

use crate::auth::Authenticator;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Fixed markdown processing pipeline.
    pub(crate) processor: Arc<ContentProcessor>,
    /// Content repository for the read paths.
    pub(crate) repository: Arc<ContentRepository>,
    /// Update coordinator for the edit path.
    pub(crate) coordinator: UpdateCoordinator,
    /// Credential validator for the protected endpoints.
    pub(crate) authenticator: Arc<dyn Authenticator>,
    /// Application version, reported by the health endpoint and mixed
    /// into ETags.
    pub(crate) version: String,
}
