//! Fair-price analysis endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{FairPriceEstimate, PurchaseChannel};
use crate::AppState;

/// Request payload for a fair-price analysis
#[derive(Debug, Deserialize)]
pub struct AnalyzePriceRequest {
    /// Optional photo of the price tag or label
    pub tag_image: Option<String>,
    /// Photo of the garment itself
    pub garment_image: String,
    /// Where the garment is being sold
    pub channel: PurchaseChannel,
}

/// POST /api/price/analyze
///
/// Estimates a fair price range and a haggling tip for a garment being
/// considered at a given purchase channel.
pub async fn analyze_price(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzePriceRequest>,
) -> ApiResult<Json<FairPriceEstimate>> {
    if payload.garment_image.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Garment image payload is empty".to_string(),
        ));
    }

    let estimate = state
        .vision
        .estimate_fair_price(
            payload.tag_image.as_deref(),
            &payload.garment_image,
            payload.channel,
        )
        .await?;

    info!(channel = %payload.channel, "Fair-price analysis completed");

    Ok(Json(estimate))
}

/// Build pricing routes
pub fn pricing_routes() -> Router<AppState> {
    Router::new().route("/api/price/analyze", post(analyze_price))
}
