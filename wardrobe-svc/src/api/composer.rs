//! Outfit composer endpoints

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::services::composer::{self, OutfitShuffle};
use crate::AppState;
use wardrobe_common::db::garments;
use wardrobe_common::garment::CatalogView;

/// Request payload for a shuffle; locked slots are exempt from the draw
#[derive(Debug, Default, Deserialize)]
pub struct ShuffleRequest {
    pub lock_top: Option<Uuid>,
    pub lock_bottom: Option<Uuid>,
}

/// Request payload for logging a worn outfit
#[derive(Debug, Deserialize)]
pub struct LogOutfitRequest {
    pub top: Option<Uuid>,
    pub bottom: Option<Uuid>,
}

/// Response payload for a logged outfit
#[derive(Debug, Serialize)]
pub struct LogOutfitResponse {
    /// How many garments actually had a wear recorded
    pub logged_count: usize,
}

/// POST /api/composer/shuffle
///
/// Draws a random outfit from the active wardrobe, honoring any locks.
pub async fn shuffle_outfit(
    State(state): State<AppState>,
    Json(payload): Json<ShuffleRequest>,
) -> ApiResult<Json<OutfitShuffle>> {
    let garments = garments::get_all_garments(&state.db).await?;
    let active: Vec<_> = garments
        .into_iter()
        .filter(|g| CatalogView::Wardrobe.contains(g))
        .collect();

    let shuffle = composer::shuffle_outfit(
        &active,
        payload.lock_top,
        payload.lock_bottom,
        &mut rand::thread_rng(),
    );
    Ok(Json(shuffle))
}

/// POST /api/composer/log
///
/// Records one wear for each garment in a worn outfit. Empty slots are
/// skipped; an entirely empty outfit logs nothing and is not an error.
pub async fn log_outfit(
    State(state): State<AppState>,
    Json(payload): Json<LogOutfitRequest>,
) -> ApiResult<Json<LogOutfitResponse>> {
    let mut logged_count = 0usize;
    for id in [payload.top, payload.bottom].into_iter().flatten() {
        if garments::increment_wear_count(&state.db, id).await? {
            logged_count += 1;
        }
    }

    info!(logged_count, "Outfit logged");

    Ok(Json(LogOutfitResponse { logged_count }))
}

/// Build composer routes
pub fn composer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/composer/shuffle", post(shuffle_outfit))
        .route("/api/composer/log", post(log_outfit))
}
