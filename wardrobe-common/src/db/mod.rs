//! Database access for the wardrobe service
//!
//! A single shared SQLite database holds the garment catalog and the
//! key-value settings table.

pub mod garments;
pub mod settings;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the database file inside the root folder, creating it (and
/// its parent directory) if missing, then creates any missing tables.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the garments and settings tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS garments (
            id TEXT PRIMARY KEY,
            image_data TEXT NOT NULL,
            category TEXT NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '',
            material TEXT NOT NULL DEFAULT '',
            price REAL NOT NULL DEFAULT 0.0,
            wear_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            box2d TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            deleted_at TEXT,
            is_wishlist INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (settings, garments)");

    Ok(())
}
