//! wardrobe-svc library interface
//!
//! Exposes the application state, router, and service internals for
//! integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use wardrobe_common::events::EventBus;

use crate::models::IngestSession;
use crate::services::vision::VisionBackend;

/// In-memory store of active ingestion sessions
pub type SessionStore = Arc<RwLock<HashMap<Uuid, IngestSession>>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Active ingestion sessions
    pub sessions: SessionStore,
    /// Remote multimodal model client
    pub vision: Arc<dyn VisionBackend>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, event_bus: EventBus, vision: Arc<dyn VisionBackend>) -> Self {
        Self {
            db,
            event_bus,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            vision,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .merge(api::ingest_routes())
        .merge(api::catalog_routes())
        .merge(api::composer_routes())
        .merge(api::pricing_routes())
        .merge(api::suggestion_routes())
        .merge(api::settings_routes())
        .merge(api::health_routes())
        .route("/ingest/events", get(api::ingest_event_stream))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
