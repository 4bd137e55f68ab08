//! Weather-aware outfit suggestion endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiResult;
use crate::AppState;
use wardrobe_common::db::garments;
use wardrobe_common::garment::CatalogView;

/// Shown when the wardrobe has nothing to suggest from
const EMPTY_WARDROBE_SUGGESTION: &str =
    "Your wardrobe is empty. Add a few garments and ask again.";

/// Shown when the remote model cannot be reached
const FALLBACK_SUGGESTION: &str =
    "Suggestions are unavailable right now. Layer for the weather and wear what you love.";

/// Query parameters for a suggestion
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionQuery {
    /// Free-form weather description, e.g. "18C, light rain"
    pub weather: Option<String>,
}

/// Suggestion response
#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
    /// False when a canned fallback was returned instead of model output
    pub from_model: bool,
}

/// GET /api/suggestion?weather=...
///
/// Asks the model to pick an outfit from the active wardrobe for today's
/// weather. Degrades to a canned line when the wardrobe is empty or the
/// model is unreachable; never fails the request for upstream reasons.
pub async fn get_suggestion(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> ApiResult<Json<SuggestionResponse>> {
    let garments = garments::get_all_garments(&state.db).await?;
    // At most 30 items go into the prompt, newest first
    let summaries: Vec<String> = garments
        .iter()
        .filter(|g| CatalogView::Wardrobe.contains(g))
        .take(30)
        .map(|g| format!("{} ({}, {}, {})", g.name, g.category, g.color, g.material))
        .collect();

    if summaries.is_empty() {
        return Ok(Json(SuggestionResponse {
            suggestion: EMPTY_WARDROBE_SUGGESTION.to_string(),
            from_model: false,
        }));
    }

    let weather = query.weather.as_deref().unwrap_or("mild and dry");

    match state.vision.suggest_outfit(&summaries, weather).await {
        Ok(suggestion) => Ok(Json(SuggestionResponse {
            suggestion,
            from_model: true,
        })),
        Err(e) => {
            warn!(error = %e, "Outfit suggestion failed; using fallback");
            Ok(Json(SuggestionResponse {
                suggestion: FALLBACK_SUGGESTION.to_string(),
                from_model: false,
            }))
        }
    }
}

/// Build suggestion routes
pub fn suggestion_routes() -> Router<AppState> {
    Router::new().route("/api/suggestion", get(get_suggestion))
}
