//! Event types and broadcast bus for SSE streaming
//!
//! Ingestion progress is pushed to connected clients over SSE: the review
//! screen shows raw crops immediately and swaps each item's image in place
//! as its background regeneration settles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Wardrobe service event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WardrobeEvent {
    /// Ingestion session created, detection in flight
    IngestSessionStarted {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Detection returned; review items (raw crops) are available
    IngestDetectionCompleted {
        session_id: Uuid,
        item_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// One review item's background regeneration settled
    ///
    /// `regenerated` is false when the call failed and the raw crop was kept.
    IngestItemImageReady {
        session_id: Uuid,
        item_index: usize,
        regenerated: bool,
        timestamp: DateTime<Utc>,
    },

    /// Detection failed, or no garments were recognized
    IngestSessionFailed {
        session_id: Uuid,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Included review items were committed to the catalog
    IngestSessionCommitted {
        session_id: Uuid,
        saved_count: usize,
        timestamp: DateTime<Utc>,
    },
}

impl WardrobeEvent {
    /// Event type name for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            WardrobeEvent::IngestSessionStarted { .. } => "IngestSessionStarted",
            WardrobeEvent::IngestDetectionCompleted { .. } => "IngestDetectionCompleted",
            WardrobeEvent::IngestItemImageReady { .. } => "IngestItemImageReady",
            WardrobeEvent::IngestSessionFailed { .. } => "IngestSessionFailed",
            WardrobeEvent::IngestSessionCommitted { .. } => "IngestSessionCommitted",
        }
    }
}

/// Broadcast bus fanning events out to SSE subscribers
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<WardrobeEvent>,
}

impl EventBus {
    /// Create a new bus. `capacity` is the number of events buffered per
    /// subscriber before old events are dropped.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<WardrobeEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of subscribers that received it; zero subscribers
    /// is not an error.
    pub fn publish(&self, event: WardrobeEvent) -> usize {
        match self.tx.send(event) {
            Ok(count) => count,
            Err(_) => 0,
        }
    }
}
