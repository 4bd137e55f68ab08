//! Settings database operations
//!
//! Get/set accessors for the settings table following the key-value pattern.
//! The only user-facing setting is the Gemini API key.

use sqlx::SqlitePool;

use crate::{Error, Result};

/// Settings key holding the Gemini API key
pub const GEMINI_API_KEY: &str = "gemini_api_key";

/// Get the Gemini API key from the database
///
/// Returns Some(key) if set, None otherwise.
pub async fn get_gemini_api_key(pool: &SqlitePool) -> Result<Option<String>> {
    get_setting::<String>(pool, GEMINI_API_KEY).await
}

/// Set the Gemini API key in the database
pub async fn set_gemini_api_key(pool: &SqlitePool, key: String) -> Result<()> {
    set_setting(pool, GEMINI_API_KEY, key).await
}

/// Generic setting getter
pub async fn get_setting<T>(pool: &SqlitePool, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some((value,)) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Internal(format!("Failed to parse setting '{}': {}", key, e))),
        None => Ok(None),
    }
}

/// Generic setting setter (insert-or-replace)
pub async fn set_setting<T: ToString>(pool: &SqlitePool, key: &str, value: T) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn api_key_round_trip() {
        let pool = test_pool().await;

        assert_eq!(get_gemini_api_key(&pool).await.unwrap(), None);

        set_gemini_api_key(&pool, "test-key-123".to_string())
            .await
            .unwrap();
        assert_eq!(
            get_gemini_api_key(&pool).await.unwrap(),
            Some("test-key-123".to_string())
        );
    }

    #[tokio::test]
    async fn set_setting_updates_existing_value() {
        let pool = test_pool().await;

        set_setting(&pool, "gemini_api_key", "old-key").await.unwrap();
        set_setting(&pool, "gemini_api_key", "new-key").await.unwrap();

        let row: (String,) =
            sqlx::query_as("SELECT value FROM settings WHERE key = 'gemini_api_key'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row.0, "new-key");
    }

    #[tokio::test]
    async fn typed_getter_parses_values() {
        let pool = test_pool().await;

        set_setting(&pool, "retention_days", 30_i64).await.unwrap();
        let days: Option<i64> = get_setting(&pool, "retention_days").await.unwrap();
        assert_eq!(days, Some(30));
    }
}
