//! Error types for the HTTP server.
//!
//! Coordinator and repository failures cross the wire as
//! `{"type": "error", "code": ..., "message": ...}` bodies so clients can
//! branch on `code`. Authentication failure is a distinct 401 rejection,
//! not part of that taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mb_content::{RepositoryError, UpdateError};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Missing or invalid credential.
    #[error("missing or invalid credential")]
    Unauthorized,

    /// Structured failure from the update protocol.
    #[error(transparent)]
    Update(#[from] UpdateError),

    /// Failure from the content repository read paths.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServerError {
    /// HTTP status for a wire error code.
    fn status_for_code(code: &str) -> StatusCode {
        match code {
            "ROUTE_NOT_FOUND" => StatusCode::NOT_FOUND,
            "CONTENT_HAS_CHANGED" => StatusCode::CONFLICT,
            "CONTENT_MISSING_FIELD" | "MALFORMED_CONTENT" | "RENDER_FAILURE" => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"error": self.to_string()}),
            ),
            Self::Update(err) => (
                Self::status_for_code(err.code()),
                json!({"type": "error", "code": err.code(), "message": err.to_string()}),
            ),
            Self::Repository(err) => (
                Self::status_for_code(err.code()),
                json!({"type": "error", "code": err.code(), "message": err.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServerError::status_for_code("ROUTE_NOT_FOUND"),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::status_for_code("CONTENT_HAS_CHANGED"),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::status_for_code("CONTENT_MISSING_FIELD"),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServerError::status_for_code("MALFORMED_CONTENT"),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServerError::status_for_code("UNKNOWN_ERROR"),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_body_shape() {
        let response = ServerError::Update(UpdateError::Changed).into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unauthorized_status() {
        let response = ServerError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
