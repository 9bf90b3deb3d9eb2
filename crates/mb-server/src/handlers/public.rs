//! Public read endpoints.
//!
//! Rendered pages and the metadata listing require no credential. Reads
//! are served from the latest committed snapshot; the rendered-page
//! endpoint supports conditional GET via ETag.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};
use mb_renderer::Attributes;
use serde_json::{Value, json};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/pages/{route}.
///
/// Returns only the rendered HTML for the route.
pub(crate) async fn load_page(
    Path(route): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let record = state.repository.find_by_route(&route)?;

    let etag = compute_etag(&state.version, &record.rendered);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::ETAG, etag),
            (
                header::CONTENT_TYPE,
                "text/html; charset=utf-8".to_owned(),
            ),
        ],
        record.rendered,
    )
        .into_response())
}

/// Handle GET /api/meta.
///
/// Returns the attributes of every stored record.
pub(crate) async fn list_meta(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Attributes>>, ServerError> {
    Ok(Json(state.repository.list_meta()?))
}

/// Handle GET /api/health.
pub(crate) async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({"status": "ok", "version": state.version}))
}

/// Compute an `ETag` from version and content.
///
/// Uses an MD5 hash truncated to 64 bits (16 hex chars) - sufficient for
/// cache invalidation with negligible collision probability.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_etag_includes_version() {
        assert_ne!(compute_etag("1.0.0", "content"), compute_etag("1.0.1", "content"));
    }

    #[test]
    fn test_compute_etag_includes_content() {
        assert_ne!(compute_etag("1.0.0", "a"), compute_etag("1.0.0", "b"));
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        // 16 hex chars + 2 quotes = 18 total
        assert_eq!(etag.len(), 18);
    }
}
