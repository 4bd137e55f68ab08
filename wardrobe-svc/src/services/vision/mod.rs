//! Remote multimodal model client
//!
//! The `VisionBackend` trait is the seam between the service and the remote
//! model: the ingestion pipeline, pricing lens, and daily suggestion all go
//! through it, so tests can substitute a stub backend. The production
//! implementation is the Gemini REST client in [`gemini`].

pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FairPriceEstimate, PurchaseChannel};
use wardrobe_common::garment::{Box2D, Category};

/// One garment detection from the remote model
///
/// Strictly typed: category strings and bounding boxes are validated at the
/// client boundary; malformed detections are rejected there and never reach
/// the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedGarment {
    pub name: String,
    pub category: Category,
    pub color: String,
    pub material: String,
    pub box2d: Box2D,
}

/// Remote model call errors
#[derive(Debug, Error)]
pub enum VisionError {
    /// No API key configured in any source
    #[error("{0}")]
    MissingApiKey(String),

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the remote API
    #[error("Remote API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response arrived but could not be interpreted
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Image generation response carried no image part
    #[error("Response contained no image data")]
    MissingImage,
}

impl From<VisionError> for crate::ApiError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::MissingApiKey(msg) => crate::ApiError::BadRequest(msg),
            other => crate::ApiError::Upstream(other.to_string()),
        }
    }
}

/// Remote multimodal model operations
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Detect individual garments in a full-body outfit photo.
    ///
    /// An empty result is a valid outcome (no garments recognized), distinct
    /// from an error.
    async fn detect_garments(
        &self,
        image_b64: &str,
    ) -> Result<Vec<DetectedGarment>, VisionError>;

    /// Generate a clean-background product shot from a cropped garment image.
    ///
    /// Best-effort: callers fall back to the crop on any error.
    async fn generate_product_shot(
        &self,
        crop_b64: &str,
        description: &str,
    ) -> Result<String, VisionError>;

    /// Estimate a fair purchase price for a garment at the given venue.
    async fn estimate_fair_price(
        &self,
        tag_image_b64: Option<&str>,
        garment_b64: &str,
        channel: PurchaseChannel,
    ) -> Result<FairPriceEstimate, VisionError>;

    /// Suggest an outfit combination from wardrobe item summaries.
    async fn suggest_outfit(
        &self,
        item_summaries: &[String],
        weather: &str,
    ) -> Result<String, VisionError>;
}
