//! Credential validation.
//!
//! The server treats authentication as an external collaborator: an
//! [`Authenticator`] either accepts or rejects a credential, and every
//! protected handler consults it before touching the repository.
//! Validation fails closed — a missing, malformed, or unknown credential
//! rejects the request.

use axum::http::{HeaderMap, header};

use crate::error::ServerError;
use crate::state::AppState;

/// Error from credential validation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The credential is not recognized.
    #[error("invalid credential")]
    Invalid,
    /// No credential is configured, so nothing can be accepted.
    #[error("no credential configured")]
    NotConfigured,
}

/// Credential validator collaborator.
pub trait Authenticator: Send + Sync {
    /// Validate a credential, failing closed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] for any credential that is not acceptable.
    fn validate(&self, credential: &str) -> Result<(), AuthError>;
}

/// Authenticator that accepts a single static bearer token.
pub struct StaticTokenAuthenticator {
    token: Option<String>,
}

impl StaticTokenAuthenticator {
    /// Create an authenticator for the given token.
    ///
    /// `None` (or an empty token) accepts no credential at all.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn validate(&self, credential: &str) -> Result<(), AuthError> {
        match &self.token {
            Some(token) if credential == token => Ok(()),
            Some(_) => Err(AuthError::Invalid),
            None => Err(AuthError::NotConfigured),
        }
    }
}

/// Require a valid bearer credential on the request.
///
/// Short-circuits with [`ServerError::Unauthorized`] before any
/// repository access can happen.
pub(crate) fn require(state: &AppState, headers: &HeaderMap) -> Result<(), ServerError> {
    let credential = bearer_token(headers).ok_or(ServerError::Unauthorized)?;
    state
        .authenticator
        .validate(credential)
        .map_err(|_| ServerError::Unauthorized)
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
