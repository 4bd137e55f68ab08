//! Ingestion endpoints
//!
//! POST /api/ingest starts a session over an uploaded photo; the session is
//! then polled (or watched over SSE), reviewed item by item, and committed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{IngestSession, IngestState, ReviewItem};
use crate::services::ingest::{self, ReviewItemUpdate};
use crate::AppState;

/// Request payload for starting an ingestion session
#[derive(Debug, Deserialize)]
pub struct StartIngestRequest {
    /// Base64-encoded source photo (bare or data-URL form)
    pub image: String,
}

/// Response payload for a freshly started session
#[derive(Debug, Serialize)]
pub struct StartIngestResponse {
    pub session_id: Uuid,
    pub state: IngestState,
    pub started_at: DateTime<Utc>,
}

/// Response payload for a committed session
#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub session_id: Uuid,
    pub saved_count: usize,
}

/// POST /api/ingest
///
/// Accepts the photo and returns 202 immediately; detection runs in the
/// background and progress arrives via GET polling or the SSE stream.
pub async fn start_ingest(
    State(state): State<AppState>,
    Json(payload): Json<StartIngestRequest>,
) -> ApiResult<(StatusCode, Json<StartIngestResponse>)> {
    if payload.image.trim().is_empty() {
        return Err(ApiError::BadRequest("Image payload is empty".to_string()));
    }

    let session = ingest::start_session(&state, payload.image).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(StartIngestResponse {
            session_id: session.session_id,
            state: session.state,
            started_at: session.started_at,
        }),
    ))
}

/// GET /api/ingest/:session_id
pub async fn get_ingest_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<IngestSession>> {
    let session = ingest::get_session(&state, session_id).await?;
    Ok(Json(session))
}

/// PATCH /api/ingest/:session_id/items/:index
///
/// Edits a review item (rename, recategorize, include/exclude). Only valid
/// while the session is in review.
pub async fn update_review_item(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(Uuid, usize)>,
    Json(update): Json<ReviewItemUpdate>,
) -> ApiResult<Json<ReviewItem>> {
    let item = ingest::update_item(&state, session_id, index, update).await?;
    Ok(Json(item))
}

/// POST /api/ingest/:session_id/commit
///
/// Saves all included items to the catalog with whatever image each holds
/// right now. Pending regenerations are not awaited.
pub async fn commit_ingest_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<CommitResponse>> {
    let saved_count = ingest::commit_session(&state, session_id).await?;
    Ok(Json(CommitResponse {
        session_id,
        saved_count,
    }))
}

/// Build ingestion routes
pub fn ingest_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ingest", post(start_ingest))
        .route("/api/ingest/:session_id", get(get_ingest_session))
        .route(
            "/api/ingest/:session_id/items/:index",
            patch(update_review_item),
        )
        .route("/api/ingest/:session_id/commit", post(commit_ingest_session))
}
