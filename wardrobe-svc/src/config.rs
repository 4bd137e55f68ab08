//! Gemini API key resolution
//!
//! Multi-tier configuration resolution with Database -> ENV -> TOML priority.
//! The database value is authoritative (it is what the settings endpoint
//! writes); the environment variable and config file serve headless setups.

use sqlx::SqlitePool;
use tracing::{info, warn};
use wardrobe_common::{Error, Result};

/// Environment variable holding the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "WARDROBE_GEMINI_API_KEY";

/// Resolve the Gemini API key from 3-tier configuration
///
/// `toml_key` is the value read from the config file at startup, if any.
pub async fn resolve_gemini_api_key(db: &SqlitePool, toml_key: Option<&str>) -> Result<String> {
    let db_key = wardrobe_common::db::settings::get_gemini_api_key(db).await?;
    let env_key = std::env::var(GEMINI_API_KEY_ENV).ok();

    let mut sources = Vec::new();
    if db_key.as_deref().is_some_and(is_valid_key) {
        sources.push("database");
    }
    if env_key.as_deref().is_some_and(is_valid_key) {
        sources.push("environment");
    }
    if toml_key.is_some_and(is_valid_key) {
        sources.push("TOML");
    }

    if sources.len() > 1 {
        warn!(
            "Gemini API key found in multiple sources: {}. Using database (highest priority).",
            sources.join(", ")
        );
    }

    // Resolution priority
    if let Some(key) = db_key {
        if is_valid_key(&key) {
            return Ok(key);
        }
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("Gemini API key loaded from environment variable");
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(key) {
            info!("Gemini API key loaded from TOML config");
            return Ok(key.to_string());
        }
    }

    Err(Error::Config(format!(
        "Gemini API key not configured. Please configure using one of:\n\
         1. API: POST /api/settings/gemini_api_key\n\
         2. Environment: {}=your-key-here\n\
         3. TOML config: wardrobe/config.toml (gemini_api_key = \"your-key\")",
        GEMINI_API_KEY_ENV
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Read the Gemini API key from the platform config file, if present
pub fn load_toml_api_key() -> Option<String> {
    let path = wardrobe_common::config::find_config_file().ok()?;
    let content = std::fs::read_to_string(path).ok()?;
    let value = toml::from_str::<toml::Value>(&content).ok()?;
    value
        .get("gemini_api_key")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
