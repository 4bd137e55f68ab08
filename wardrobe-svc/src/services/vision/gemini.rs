//! Gemini REST client
//!
//! Calls the `generateContent` endpoint with typed request/response structs.
//! Text-mode calls (detection, pricing, suggestion) request a JSON response
//! mime type and parse the first text part; image-mode calls scan candidate
//! parts for inline image data.
//!
//! The API key is resolved per request (Database -> ENV -> TOML) so a key
//! saved through the settings endpoint takes effect without a restart.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use async_trait::async_trait;

use super::{DetectedGarment, VisionBackend, VisionError};
use crate::models::{FairPriceEstimate, PurchaseChannel};
use wardrobe_common::garment::{Box2D, Category};

/// Gemini API base URL
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model for text/JSON analysis calls
const ANALYSIS_MODEL: &str = "gemini-2.5-flash";

/// Model for product-shot image generation
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default timeout for Gemini API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini client configuration
///
/// Passed explicitly to the client constructor; the client never reads
/// ambient global state.
pub struct GeminiConfig {
    /// Pool used to resolve the API key from the settings table
    pub db: SqlitePool,
    /// API key from the TOML config file, if any (lowest priority)
    pub toml_api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(db: SqlitePool, toml_api_key: Option<String>) -> Self {
        Self {
            db,
            toml_api_key,
            base_url: GEMINI_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Gemini REST client
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    async fn api_key(&self) -> Result<String, VisionError> {
        crate::config::resolve_gemini_api_key(&self.config.db, self.config.toml_api_key.as_deref())
            .await
            .map_err(|e| VisionError::MissingApiKey(e.to_string()))
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, VisionError> {
        let api_key = self.api_key().await?;
        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);

        debug!(model, "Sending generateContent request");
        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VisionBackend for GeminiClient {
    async fn detect_garments(
        &self,
        image_b64: &str,
    ) -> Result<Vec<DetectedGarment>, VisionError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_image("image/jpeg", clean_base64(image_b64)),
                    Part::text(DETECT_PROMPT),
                ],
            }],
            generation_config: Some(GenerationConfig::json()),
        };

        let response = self.generate(ANALYSIS_MODEL, &request).await?;
        let text = first_text(&response)
            .ok_or_else(|| VisionError::MalformedResponse("no text part".to_string()))?;

        let raw: Vec<RawDetection> = serde_json::from_str(text)
            .map_err(|e| VisionError::MalformedResponse(format!("detection JSON: {}", e)))?;

        Ok(validate_detections(raw))
    }

    async fn generate_product_shot(
        &self,
        crop_b64: &str,
        description: &str,
    ) -> Result<String, VisionError> {
        let prompt = format!(
            "Task: Generate a high-fidelity, stand-alone e-commerce product shot \
             of the {}.\n\
             Requirements:\n\
             1. Solid pure white (#FFFFFF) background.\n\
             2. Pixel-perfect isolation: clean edges, no artifacts.\n\
             3. Remove all skin, hands, body parts, and hangers; the item should \
             look like it is floating or on a ghost mannequin.\n\
             4. Sharp detail, texture, and studio lighting.\n\
             5. Keep the original color, texture, and shape exactly.\n\
             Output: a single square image of the item.",
            description
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_image("image/png", clean_base64(crop_b64)),
                    Part::text(&prompt),
                ],
            }],
            generation_config: None,
        };

        let response = self.generate(IMAGE_MODEL, &request).await?;
        first_inline_image(&response).ok_or(VisionError::MissingImage)
    }

    async fn estimate_fair_price(
        &self,
        tag_image_b64: Option<&str>,
        garment_b64: &str,
        channel: PurchaseChannel,
    ) -> Result<FairPriceEstimate, VisionError> {
        let prompt = format!(
            "You are a professional garment buyer. Estimate a fair purchase price \
             for this garment at a {}.\n\
             Rules:\n\
             1. If a care tag photo is provided, read the fabric composition from \
             it verbatim; never invent one.\n\
             2. Without a tag, estimate material and workmanship from the garment \
             photo.\n\
             3. Base the range on estimated manufacturing cost times a venue \
             multiplier.\n\
             4. If a cheap synthetic fabric (polyester, acrylic, rayon) carries a \
             premium price, set is_rip_off to true.\n\
             5. Provide one short haggling line (haggle_tip).\n\
             Output JSON with keys: material, base_cost, fair_price_range, \
             haggle_tip, is_rip_off.",
            channel.label()
        );

        let mut parts = vec![
            Part::text(&prompt),
            Part::inline_image("image/jpeg", clean_base64(garment_b64)),
        ];
        if let Some(tag) = tag_image_b64 {
            parts.push(Part::inline_image("image/jpeg", clean_base64(tag)));
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: Some(GenerationConfig::json()),
        };

        let response = self.generate(ANALYSIS_MODEL, &request).await?;
        let text = first_text(&response)
            .ok_or_else(|| VisionError::MalformedResponse("no text part".to_string()))?;

        serde_json::from_str(text)
            .map_err(|e| VisionError::MalformedResponse(format!("price JSON: {}", e)))
    }

    async fn suggest_outfit(
        &self,
        item_summaries: &[String],
        weather: &str,
    ) -> Result<String, VisionError> {
        let prompt = format!(
            "Role: personal stylist assistant.\n\
             Wardrobe: [{}].\n\
             Weather: \"{}\".\n\
             Task: suggest one specific outfit combination from the wardrobe for \
             tomorrow. Warm, encouraging tone, at most two sentences.\n\
             Output JSON with a single key: suggestion.",
            item_summaries.join(", "),
            weather
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(&prompt)],
            }],
            generation_config: Some(GenerationConfig::json()),
        };

        let response = self.generate(ANALYSIS_MODEL, &request).await?;
        let text = first_text(&response)
            .ok_or_else(|| VisionError::MalformedResponse("no text part".to_string()))?;

        let payload: SuggestionPayload = serde_json::from_str(text)
            .map_err(|e| VisionError::MalformedResponse(format!("suggestion JSON: {}", e)))?;
        Ok(payload.suggestion)
    }
}

const DETECT_PROMPT: &str = "Analyze this outfit photo. Detect INDIVIDUAL clothing \
items (outerwear, tops, bottoms, shoes, dresses, accessories).\n\
For EACH item:\n\
1. Return a TIGHT bounding box [ymin, xmin, ymax, xmax] on a 0-1000 scale, \
strictly enclosing the visible garment.\n\
2. Name it (e.g. \"brown leather jacket\", \"blue straight-leg jeans\").\n\
3. Categorize it as exactly one of: Tops, Bottoms, Outerwear, Shoes, Dresses, \
Accessories.\n\
4. Identify color and material.\n\
Ignore skin, background, and body parts. Output a JSON array of objects with \
keys: name, category, color, material, box_2d.";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

impl GenerationConfig {
    fn json() -> Self {
        Self {
            response_mime_type: "application/json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        rename = "inlineData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline_image(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    suggestion: String,
}

/// Raw, unvalidated detection as returned by the model
#[derive(Debug, Deserialize)]
struct RawDetection {
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    material: String,
    #[serde(default)]
    box_2d: Vec<i64>,
}

/// Validate raw detections, dropping malformed entries
///
/// Unknown category strings and degenerate or out-of-range boxes are
/// rejected here with a warning rather than stored as-is.
fn validate_detections(raw: Vec<RawDetection>) -> Vec<DetectedGarment> {
    raw.into_iter()
        .filter_map(|det| {
            let category = match Category::from_str(&det.category) {
                Ok(cat) => cat,
                Err(_) => {
                    warn!(
                        category = %det.category,
                        name = %det.name,
                        "Rejecting detection with unknown category"
                    );
                    return None;
                }
            };

            if det.box_2d.len() != 4 {
                warn!(name = %det.name, "Rejecting detection with malformed box");
                return None;
            }
            let box2d = Box2D {
                ymin: det.box_2d[0],
                xmin: det.box_2d[1],
                ymax: det.box_2d[2],
                xmax: det.box_2d[3],
            };
            if !box2d.is_well_formed() {
                warn!(name = %det.name, ?box2d, "Rejecting detection with degenerate box");
                return None;
            }

            Some(DetectedGarment {
                name: det.name,
                category,
                color: det.color,
                material: det.material,
                box2d,
            })
        })
        .collect()
}

/// Strip a data-URL prefix if present, returning bare base64
fn clean_base64(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, b64)) => b64,
        None => data,
    }
}

fn first_text(response: &GenerateContentResponse) -> Option<&str> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.text.as_deref())
}

fn first_inline_image(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.inline_data.as_ref().map(|d| d.data.clone()))
}
