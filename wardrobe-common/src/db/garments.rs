//! Garment catalog database operations
//!
//! Single logical table keyed by id. Writes are insert-or-replace; reads are
//! fetch-all sorted by creation time descending, with partition filtering
//! done by the caller. Mutations enforce their partition preconditions in the
//! WHERE clause and report whether a row matched, so callers can distinguish
//! "not found / wrong partition" from success.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

use crate::garment::{Box2D, Category, GarmentRecord};
use crate::{Error, Result};

/// Insert or replace a garment record by id
pub async fn save_garment(pool: &SqlitePool, record: &GarmentRecord) -> Result<()> {
    let box2d = record
        .box2d
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to serialize box2d: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO garments (
            id, image_data, category, name, color, material,
            price, wear_count, created_at, box2d,
            is_deleted, deleted_at, is_wishlist
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            image_data = excluded.image_data,
            category = excluded.category,
            name = excluded.name,
            color = excluded.color,
            material = excluded.material,
            price = excluded.price,
            wear_count = excluded.wear_count,
            box2d = excluded.box2d,
            is_deleted = excluded.is_deleted,
            deleted_at = excluded.deleted_at,
            is_wishlist = excluded.is_wishlist
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.image_data)
    .bind(record.category.as_str())
    .bind(&record.name)
    .bind(&record.color)
    .bind(&record.material)
    .bind(record.price)
    .bind(record.wear_count)
    .bind(record.created_at.to_rfc3339())
    .bind(box2d)
    .bind(record.is_deleted as i64)
    .bind(record.deleted_at.map(|dt| dt.to_rfc3339()))
    .bind(record.is_wishlist as i64)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch all garment records, newest first
pub async fn get_all_garments(pool: &SqlitePool) -> Result<Vec<GarmentRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, image_data, category, name, color, material,
               price, wear_count, created_at, box2d,
               is_deleted, deleted_at, is_wishlist
        FROM garments
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_garment).collect()
}

/// Fetch a single garment record by id
pub async fn get_garment(pool: &SqlitePool, id: Uuid) -> Result<Option<GarmentRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, image_data, category, name, color, material,
               price, wear_count, created_at, box2d,
               is_deleted, deleted_at, is_wishlist
        FROM garments
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_garment).transpose()
}

/// Move an active or wishlisted record to the recycle bin
///
/// Returns false when the record does not exist or is already deleted.
pub async fn soft_delete_garment(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE garments SET is_deleted = 1, deleted_at = ? WHERE id = ? AND is_deleted = 0",
    )
    .bind(Utc::now().to_rfc3339())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Restore a record from the recycle bin, clearing its deletion timestamp
pub async fn restore_garment(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE garments SET is_deleted = 0, deleted_at = NULL WHERE id = ? AND is_deleted = 1",
    )
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Permanently remove a binned record. Irreversible.
pub async fn permanent_delete_garment(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM garments WHERE id = ? AND is_deleted = 1")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Move an active record to the wishlist
pub async fn move_to_wishlist(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE garments SET is_wishlist = 1 WHERE id = ? AND is_deleted = 0 AND is_wishlist = 0",
    )
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Move a wishlisted record back to the active wardrobe
pub async fn move_to_wardrobe(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE garments SET is_wishlist = 0 WHERE id = ? AND is_deleted = 0 AND is_wishlist = 1",
    )
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Increment the wear count of a non-deleted record
pub async fn increment_wear_count(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE garments SET wear_count = wear_count + 1 WHERE id = ? AND is_deleted = 0",
    )
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn row_to_garment(row: &sqlx::sqlite::SqliteRow) -> Result<GarmentRecord> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|e| Error::Internal(format!("Invalid garment id in database: {}", e)))?;

    let category: String = row.get("category");
    let category = Category::from_str(&category)
        .map_err(|_| Error::Internal(format!("Invalid garment category in database: {}", category)))?;

    let created_at: String = row.get("created_at");
    let created_at = parse_timestamp(&created_at, "created_at")?;

    let deleted_at: Option<String> = row.get("deleted_at");
    let deleted_at = deleted_at
        .map(|s| parse_timestamp(&s, "deleted_at"))
        .transpose()?;

    let box2d: Option<String> = row.get("box2d");
    let box2d: Option<Box2D> = box2d
        .map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to deserialize box2d: {}", e)))?;

    let is_deleted: i64 = row.get("is_deleted");
    let is_wishlist: i64 = row.get("is_wishlist");

    Ok(GarmentRecord {
        id,
        image_data: row.get("image_data"),
        category,
        name: row.get("name"),
        color: row.get("color"),
        material: row.get("material"),
        price: row.get("price"),
        wear_count: row.get("wear_count"),
        created_at,
        box2d,
        is_deleted: is_deleted != 0,
        deleted_at,
        is_wishlist: is_wishlist != 0,
    })
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}
