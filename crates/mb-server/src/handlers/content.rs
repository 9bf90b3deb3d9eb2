//! Protected content API endpoints.
//!
//! All handlers here require a valid bearer credential; validation runs
//! before any repository access.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use mb_content::{ContentRecord, UpdateError};
use mb_renderer::ProcessedContent;
use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::error::ServerError;
use crate::state::AppState;

/// Request body for POST /api/content/parse.
#[derive(Deserialize)]
pub(crate) struct ParseRequest {
    /// Raw markdown to process.
    content: String,
}

/// Request body for POST /api/content.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRequest {
    /// Raw markdown to store.
    content: String,
    /// Expected current `raw` of the stored record; omit to create or
    /// deliberately override any conflict.
    #[serde(default)]
    expected_prior_raw: Option<String>,
}

/// Handle POST /api/content/parse.
///
/// Runs the markdown pipeline without touching the repository.
pub(crate) async fn parse_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ParseRequest>,
) -> Result<Json<ProcessedContent>, ServerError> {
    auth::require(&state, &headers)?;

    let processed = state
        .processor
        .process(&request.content)
        .map_err(UpdateError::from)?;
    Ok(Json(processed))
}

/// Handle POST /api/content.
///
/// Applies the optimistic-concurrency update protocol.
pub(crate) async fn update_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<UpdateRequest>,
) -> Result<impl IntoResponse, ServerError> {
    auth::require(&state, &headers)?;

    state
        .coordinator
        .update(&request.content, request.expected_prior_raw.as_deref())?;

    tracing::info!("content updated");
    Ok(Json(json!({"status": "ok"})))
}

/// Handle GET /api/content/{route}.
///
/// Returns the full stored record for the route.
pub(crate) async fn get_content(
    Path(route): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ContentRecord>, ServerError> {
    auth::require(&state, &headers)?;

    let record = state.repository.find_by_route(&route)?;
    Ok(Json(record))
}
