//! Settings endpoints
//!
//! Web-facing configuration of the Gemini API key. The database copy is
//! authoritative; GET never echoes the key itself.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use wardrobe_common::db::settings;

/// Request payload for setting the Gemini API key
#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    pub api_key: String,
}

/// Response payload for API key configuration
#[derive(Debug, Serialize)]
pub struct SetApiKeyResponse {
    pub success: bool,
    pub message: String,
}

/// Response payload describing key status without revealing it
#[derive(Debug, Serialize)]
pub struct ApiKeyStatusResponse {
    pub configured: bool,
}

/// POST /api/settings/gemini_api_key
///
/// **Request:** `{"api_key": "your-gemini-key"}`
///
/// Validates the key (non-empty, non-whitespace) and writes it to the
/// database, where it takes priority over any environment or TOML value.
pub async fn set_gemini_api_key(
    State(state): State<AppState>,
    Json(payload): Json<SetApiKeyRequest>,
) -> ApiResult<Json<SetApiKeyResponse>> {
    if !crate::config::is_valid_key(&payload.api_key) {
        return Err(ApiError::BadRequest(
            "API key cannot be empty or whitespace-only".to_string(),
        ));
    }

    settings::set_gemini_api_key(&state.db, payload.api_key)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save API key: {}", e)))?;

    info!("Gemini API key configured via API");

    Ok(Json(SetApiKeyResponse {
        success: true,
        message: "Gemini API key saved".to_string(),
    }))
}

/// GET /api/settings/gemini_api_key
///
/// Reports whether a key is configured in the database. The key value is
/// never returned.
pub async fn get_gemini_api_key_status(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiKeyStatusResponse>> {
    let key = settings::get_gemini_api_key(&state.db)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read settings: {}", e)))?;

    let configured = key.map(|k| crate::config::is_valid_key(&k)).unwrap_or(false);

    Ok(Json(ApiKeyStatusResponse { configured }))
}

/// Build settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/api/settings/gemini_api_key",
        post(set_gemini_api_key).get(get_gemini_api_key_status),
    )
}
