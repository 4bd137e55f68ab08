//! wardrobe-svc - Wardrobe management service
//!
//! Local-first, single-user service: garment catalog in SQLite, all model
//! intelligence (detection, product shots, pricing, styling) delegated to
//! the Gemini API, progress streamed over SSE.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wardrobe_common::events::EventBus;

use wardrobe_svc::services::ingest;
use wardrobe_svc::services::vision::{GeminiClient, GeminiConfig};
use wardrobe_svc::AppState;

const LISTEN_ADDR: &str = "127.0.0.1:5734";

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting wardrobe-svc");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Root folder: CLI arg -> env -> TOML -> OS default
    let cli_root = std::env::args().nth(1);
    let root_folder = wardrobe_common::config::resolve_root_folder(cli_root.as_deref());
    let db_path = wardrobe_common::config::ensure_root_folder(&root_folder)?;
    info!("Database: {}", db_path.display());

    let db_pool = wardrobe_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let event_bus = EventBus::new(100);

    // The API key itself is resolved per call (Database -> ENV -> TOML), so
    // a key saved through the settings endpoint takes effect immediately.
    let toml_api_key = wardrobe_svc::config::load_toml_api_key();
    let vision = GeminiClient::new(GeminiConfig::new(db_pool.clone(), toml_api_key));

    let state = AppState::new(db_pool, event_bus, Arc::new(vision));

    // Periodic sweep of finished ingestion sessions; they also get swept
    // whenever a new session starts.
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        loop {
            tick.tick().await;
            ingest::evict_expired_sessions(
                &sweep_state,
                chrono::Duration::seconds(ingest::SESSION_RETENTION_SECS),
            )
            .await;
        }
    });

    let app = wardrobe_svc::build_router(state);

    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR).await?;
    info!("Listening on http://{}", LISTEN_ADDR);
    info!("Health check: http://{}/health", LISTEN_ADDR);

    axum::serve(listener, app).await?;

    Ok(())
}
