//! Ingestion session state machine
//!
//! A session is created per uploaded outfit photo and progresses
//! SCANNING -> REVIEW -> COMMITTED. Detection failures end in FAILED; a valid
//! detection with zero garments ends in NO_GARMENTS (a distinct, non-error
//! outcome: the client restarts from the upload step).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wardrobe_common::garment::{Box2D, Category, GarmentRecord};

/// Ingestion workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestState {
    /// Detection call in flight; no user interaction accepted
    Scanning,
    /// Review items available; edits and commit accepted while
    /// regeneration continues in the background
    Review,
    /// Detection succeeded but recognized no garments
    NoGarments,
    /// Detection failed (transport or parse error)
    Failed,
    /// Included items were persisted to the catalog
    Committed,
}

/// One detected garment under review
///
/// `image_data` starts as the raw geometric crop and is replaced in place if
/// the background regeneration for this item succeeds. `generating` is true
/// until that call settles; on failure the crop is kept permanently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Record id, assigned at detection time and kept through commit
    pub id: Uuid,
    /// Base64-encoded image currently shown for this item
    pub image_data: String,
    pub name: String,
    pub category: Category,
    pub color: String,
    pub material: String,
    pub box2d: Box2D,
    pub created_at: DateTime<Utc>,
    /// Included in the commit (default true)
    pub included: bool,
    /// Regeneration still in flight
    pub generating: bool,
    /// Image was replaced by a regenerated product shot
    pub regenerated: bool,
}

impl ReviewItem {
    /// Freeze this item into a catalog record using whatever image it holds
    /// right now.
    pub fn into_record(self) -> GarmentRecord {
        GarmentRecord {
            id: self.id,
            image_data: self.image_data,
            category: self.category,
            name: self.name,
            color: self.color,
            material: self.material,
            price: 0.0,
            wear_count: 0,
            created_at: self.created_at,
            box2d: Some(self.box2d),
            is_deleted: false,
            deleted_at: None,
            is_wishlist: false,
        }
    }
}

/// Ingestion session (in-memory state)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSession {
    pub session_id: Uuid,
    pub state: IngestState,
    pub items: Vec<ReviewItem>,
    /// User-facing message for FAILED / NO_GARMENTS
    pub message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl IngestSession {
    /// Create a new session in the SCANNING state
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: IngestState::Scanning,
            items: Vec::new(),
            message: None,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Terminal states accept no further mutation from the pipeline
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            IngestState::NoGarments | IngestState::Failed | IngestState::Committed
        )
    }
}

impl Default for IngestSession {
    fn default() -> Self {
        Self::new()
    }
}
