//! Ingestion pipeline orchestration
//!
//! One uploaded outfit photo becomes zero or more committable garment
//! records: remote detection, local cropping, then per-item background
//! regeneration running concurrently while the user reviews.
//!
//! Concurrency contract: the review state is entered with the N raw crops
//! immediately; N regeneration tasks are then spawned independently, each
//! writing only its own index as it settles, in any completion order. A
//! commit freezes whatever image each included item holds at that moment and
//! never blocks on pending regenerations.

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{IngestSession, IngestState, ReviewItem};
use crate::services::cropper;
use crate::AppState;
use serde::Deserialize;
use wardrobe_common::events::WardrobeEvent;
use wardrobe_common::garment::Category;

/// How long finished sessions stay queryable before eviction
///
/// Terminal sessions hold every item's base64 image, so they cannot be kept
/// for the life of the process. Clients consume the result well within this
/// window; after it the session is swept from the in-memory store.
pub const SESSION_RETENTION_SECS: i64 = 300;

/// User-facing message for a valid detection that found nothing
const NO_GARMENTS_MESSAGE: &str =
    "No garments recognized. Try a clearer, front-facing full-body photo.";

/// User-facing message for a failed detection call
const DETECTION_FAILED_MESSAGE: &str =
    "Detection failed. Check your network connection and try again.";

/// Editable fields of a review item
#[derive(Debug, Default, Deserialize)]
pub struct ReviewItemUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub included: Option<bool>,
}

/// Create a session for an uploaded photo and start detection in the
/// background. Returns a snapshot of the new session (state SCANNING).
pub async fn start_session(state: &AppState, image_b64: String) -> IngestSession {
    evict_expired_sessions(state, chrono::Duration::seconds(SESSION_RETENTION_SECS)).await;

    let session = IngestSession::new();
    let session_id = session.session_id;

    state
        .sessions
        .write()
        .await
        .insert(session_id, session.clone());

    state.event_bus.publish(WardrobeEvent::IngestSessionStarted {
        session_id,
        timestamp: Utc::now(),
    });

    info!(%session_id, "Ingestion session started");

    let task_state = state.clone();
    tokio::spawn(async move {
        run_detection(task_state, session_id, image_b64).await;
    });

    session
}

/// Sweep terminal sessions whose retention window has elapsed
///
/// Runs on every new session and periodically from main, so the store is
/// bounded by the sessions finished within the retention window plus any
/// still in progress. Returns the number of sessions removed.
pub async fn evict_expired_sessions(state: &AppState, retention: chrono::Duration) -> usize {
    let cutoff = Utc::now() - retention;
    let mut sessions = state.sessions.write().await;
    let before = sessions.len();
    sessions.retain(|_, session| {
        !(session.is_terminal() && session.ended_at.is_some_and(|ended| ended <= cutoff))
    });
    let evicted = before - sessions.len();
    if evicted > 0 {
        debug!(evicted, retained = sessions.len(), "Evicted expired ingestion sessions");
    }
    evicted
}

/// Fetch a session snapshot
pub async fn get_session(state: &AppState, session_id: Uuid) -> ApiResult<IngestSession> {
    state
        .sessions
        .read()
        .await
        .get(&session_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Ingestion session not found: {}", session_id)))
}

/// Apply a user edit to one review item
pub async fn update_item(
    state: &AppState,
    session_id: Uuid,
    index: usize,
    update: ReviewItemUpdate,
) -> ApiResult<ReviewItem> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Ingestion session not found: {}", session_id)))?;

    if session.state != IngestState::Review {
        return Err(ApiError::Conflict(format!(
            "Session is not in review (state: {:?})",
            session.state
        )));
    }

    let item = session
        .items
        .get_mut(index)
        .ok_or_else(|| ApiError::NotFound(format!("No review item at index {}", index)))?;

    if let Some(name) = update.name {
        item.name = name;
    }
    if let Some(category) = update.category {
        item.category = category;
    }
    if let Some(included) = update.included {
        item.included = included;
    }

    Ok(item.clone())
}

/// Persist every included item and mark the session committed
///
/// Whatever image each item holds right now (raw crop or regenerated shot)
/// is what gets saved; pending regenerations are not awaited. The N writes
/// are independent: a failure partway through leaves earlier items saved.
pub async fn commit_session(state: &AppState, session_id: Uuid) -> ApiResult<usize> {
    // Snapshot the included items under the lock, then write without it.
    let included: Vec<ReviewItem> = {
        let sessions = state.sessions.read().await;
        let session = sessions.get(&session_id).ok_or_else(|| {
            ApiError::NotFound(format!("Ingestion session not found: {}", session_id))
        })?;

        if session.state != IngestState::Review {
            return Err(ApiError::Conflict(format!(
                "Session is not in review (state: {:?})",
                session.state
            )));
        }

        session.items.iter().filter(|i| i.included).cloned().collect()
    };

    if included.is_empty() {
        return Err(ApiError::BadRequest(
            "No items are included in this commit".to_string(),
        ));
    }

    let mut saved = 0usize;
    for item in included {
        let record = item.into_record();
        wardrobe_common::db::garments::save_garment(&state.db, &record)
            .await
            .map_err(|e| {
                error!(%session_id, saved, error = %e, "Commit failed partway through");
                ApiError::Internal(format!("Failed to save garment: {}", e))
            })?;
        saved += 1;
    }

    if let Some(session) = state.sessions.write().await.get_mut(&session_id) {
        session.state = IngestState::Committed;
        session.ended_at = Some(Utc::now());
    }

    state
        .event_bus
        .publish(WardrobeEvent::IngestSessionCommitted {
            session_id,
            saved_count: saved,
            timestamp: Utc::now(),
        });

    info!(%session_id, saved, "Ingestion session committed");

    Ok(saved)
}

/// Background detection: remote detect, local crop, enter review, fan out
/// regeneration tasks.
async fn run_detection(state: AppState, session_id: Uuid, image_b64: String) {
    let detections = match state.vision.detect_garments(&image_b64).await {
        Ok(detections) => detections,
        Err(e) => {
            warn!(%session_id, error = %e, "Garment detection failed");
            fail_session(&state, session_id, IngestState::Failed, DETECTION_FAILED_MESSAGE).await;
            return;
        }
    };

    if detections.is_empty() {
        info!(%session_id, "Detection returned no garments");
        fail_session(&state, session_id, IngestState::NoGarments, NO_GARMENTS_MESSAGE).await;
        return;
    }

    let source = match cropper::decode_image(&image_b64) {
        Ok(img) => img,
        Err(e) => {
            warn!(%session_id, error = %e, "Source image could not be decoded");
            fail_session(&state, session_id, IngestState::Failed, DETECTION_FAILED_MESSAGE).await;
            return;
        }
    };

    let now = Utc::now();
    let mut items = Vec::with_capacity(detections.len());
    for detection in detections {
        let crop = match cropper::crop_to_box(&source, &detection.box2d) {
            Ok(crop) => crop,
            Err(e) => {
                warn!(%session_id, name = %detection.name, error = %e, "Skipping uncroppable detection");
                continue;
            }
        };
        items.push(ReviewItem {
            id: Uuid::new_v4(),
            image_data: crop,
            name: detection.name,
            category: detection.category,
            color: detection.color,
            material: detection.material,
            box2d: detection.box2d,
            created_at: now,
            included: true,
            generating: true,
            regenerated: false,
        });
    }

    if items.is_empty() {
        fail_session(&state, session_id, IngestState::NoGarments, NO_GARMENTS_MESSAGE).await;
        return;
    }

    let item_count = items.len();
    let regen_inputs: Vec<(usize, String, String)> = items
        .iter()
        .enumerate()
        .map(|(index, item)| (index, item.image_data.clone(), item.name.clone()))
        .collect();

    {
        let mut sessions = state.sessions.write().await;
        let Some(session) = sessions.get_mut(&session_id) else {
            return;
        };
        session.state = IngestState::Review;
        session.items = items;
    }

    state
        .event_bus
        .publish(WardrobeEvent::IngestDetectionCompleted {
            session_id,
            item_count,
            timestamp: Utc::now(),
        });

    info!(%session_id, item_count, "Review ready; regenerating product shots");

    // Fan out: one task per item, each owning writes to its own index.
    for (index, crop, name) in regen_inputs {
        let task_state = state.clone();
        tokio::spawn(async move {
            regenerate_item(task_state, session_id, index, crop, name).await;
        });
    }
}

/// Regenerate one item's product shot and settle its review slot
///
/// On failure the raw crop is kept permanently; either way the item's
/// generating flag resolves to false. Updates are index-addressed, so a
/// late-settling neighbor can never clobber this slot.
async fn regenerate_item(
    state: AppState,
    session_id: Uuid,
    index: usize,
    crop_b64: String,
    description: String,
) {
    let result = state
        .vision
        .generate_product_shot(&crop_b64, &description)
        .await;

    let regenerated = {
        let mut sessions = state.sessions.write().await;
        let Some(session) = sessions.get_mut(&session_id) else {
            // Session discarded while the call was in flight; nothing to do.
            return;
        };
        let Some(item) = session.items.get_mut(index) else {
            return;
        };

        let regenerated = match result {
            Ok(image) => {
                item.image_data = image;
                item.regenerated = true;
                true
            }
            Err(e) => {
                warn!(%session_id, index, error = %e, "Product shot failed; keeping crop");
                false
            }
        };
        item.generating = false;
        regenerated
    };

    state.event_bus.publish(WardrobeEvent::IngestItemImageReady {
        session_id,
        item_index: index,
        regenerated,
        timestamp: Utc::now(),
    });
}

async fn fail_session(state: &AppState, session_id: Uuid, new_state: IngestState, message: &str) {
    {
        let mut sessions = state.sessions.write().await;
        let Some(session) = sessions.get_mut(&session_id) else {
            return;
        };
        session.state = new_state;
        session.message = Some(message.to_string());
        session.ended_at = Some(Utc::now());
    }

    state.event_bus.publish(WardrobeEvent::IngestSessionFailed {
        session_id,
        message: message.to_string(),
        timestamp: Utc::now(),
    });
}
