//! Catalog endpoints
//!
//! Garment listing over the three views (wardrobe, wishlist, bin), the
//! lifecycle mutations between them, wear tracking, and the value insights
//! summary.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::insights::{self, CatalogInsights};
use crate::AppState;
use wardrobe_common::db::garments;
use wardrobe_common::garment::{CatalogView, Category, GarmentRecord};

/// Query parameters for listing garments
#[derive(Debug, Default, Deserialize)]
pub struct ListGarmentsQuery {
    /// Which view to list; defaults to the wardrobe
    pub view: Option<String>,
    /// Optional category filter on top of the view
    pub category: Option<String>,
}

/// Response payload for a lifecycle mutation
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub id: Uuid,
    pub success: bool,
}

/// GET /api/garments?view=wardrobe&category=Tops
///
/// Lists one view of the catalog, newest first. The bin takes precedence
/// over the wishlist flag, so a deleted wishlist item only shows here under
/// view=bin.
pub async fn list_garments(
    State(state): State<AppState>,
    Query(query): Query<ListGarmentsQuery>,
) -> ApiResult<Json<Vec<GarmentRecord>>> {
    let view = match query.view.as_deref() {
        None => CatalogView::Wardrobe,
        Some(raw) => raw
            .parse::<CatalogView>()
            .map_err(|_| ApiError::BadRequest(format!("Unknown view: {}", raw)))?,
    };

    let category = match query.category.as_deref() {
        None => None,
        Some(raw) => Some(
            raw.parse::<Category>()
                .map_err(|_| ApiError::BadRequest(format!("Unknown category: {}", raw)))?,
        ),
    };

    let garments = garments::get_all_garments(&state.db).await?;
    let filtered = garments
        .into_iter()
        .filter(|g| view.contains(g))
        .filter(|g| category.map_or(true, |c| g.category == c))
        .collect();

    Ok(Json(filtered))
}

/// GET /api/insights
///
/// Cost-per-wear summary of the active wardrobe.
pub async fn catalog_insights(
    State(state): State<AppState>,
) -> ApiResult<Json<CatalogInsights>> {
    let garments = garments::get_all_garments(&state.db).await?;
    Ok(Json(insights::compute_insights(&garments)))
}

/// POST /api/garments/:id/delete - move an active garment to the bin
pub async fn delete_garment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let moved = garments::soft_delete_garment(&state.db, id).await?;
    mutation_outcome(&state, id, moved, "Garment is already in the bin").await
}

/// POST /api/garments/:id/restore - move a binned garment back out
pub async fn restore_garment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let moved = garments::restore_garment(&state.db, id).await?;
    mutation_outcome(&state, id, moved, "Garment is not in the bin").await
}

/// DELETE /api/garments/:id - permanently remove a binned garment
pub async fn purge_garment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let removed = garments::permanent_delete_garment(&state.db, id).await?;
    mutation_outcome(&state, id, removed, "Only binned garments can be purged").await
}

/// POST /api/garments/:id/wishlist - move an active garment to the wishlist
pub async fn move_to_wishlist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let moved = garments::move_to_wishlist(&state.db, id).await?;
    mutation_outcome(&state, id, moved, "Garment is not an active wardrobe piece").await
}

/// POST /api/garments/:id/wardrobe - promote a wishlist garment to the wardrobe
pub async fn move_to_wardrobe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let moved = garments::move_to_wardrobe(&state.db, id).await?;
    mutation_outcome(&state, id, moved, "Garment is not on the wishlist").await
}

/// POST /api/garments/:id/wear - record one wear of an active garment
pub async fn record_wear(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let counted = garments::increment_wear_count(&state.db, id).await?;
    mutation_outcome(&state, id, counted, "Binned garments cannot be worn").await
}

/// Turn a precondition-guarded mutation result into a response. A failed
/// mutation is a 404 when the garment does not exist at all, otherwise a
/// 409 naming the violated precondition.
async fn mutation_outcome(
    state: &AppState,
    id: Uuid,
    success: bool,
    conflict: &str,
) -> ApiResult<Json<MutationResponse>> {
    if success {
        return Ok(Json(MutationResponse { id, success: true }));
    }
    match garments::get_garment(&state.db, id).await? {
        Some(_) => Err(ApiError::Conflict(conflict.to_string())),
        None => Err(ApiError::NotFound(format!("Garment not found: {}", id))),
    }
}

/// Build catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/garments", get(list_garments))
        .route("/api/insights", get(catalog_insights))
        .route("/api/garments/:id", delete(purge_garment))
        .route("/api/garments/:id/delete", post(delete_garment))
        .route("/api/garments/:id/restore", post(restore_garment))
        .route("/api/garments/:id/wishlist", post(move_to_wishlist))
        .route("/api/garments/:id/wardrobe", post(move_to_wardrobe))
        .route("/api/garments/:id/wear", post(record_wear))
}
