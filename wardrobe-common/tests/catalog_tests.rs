//! Integration tests for garment catalog database operations

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use wardrobe_common::db::{garments, init_tables};
use wardrobe_common::garment::{Box2D, Category, CatalogView, GarmentRecord};

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_tables(&pool).await.unwrap();
    pool
}

fn sample_record(name: &str, category: Category) -> GarmentRecord {
    GarmentRecord {
        id: Uuid::new_v4(),
        image_data: "aW1hZ2U=".to_string(),
        category,
        name: name.to_string(),
        color: "navy".to_string(),
        material: "wool".to_string(),
        price: 120.0,
        wear_count: 0,
        created_at: Utc::now(),
        box2d: Some(Box2D { ymin: 10, xmin: 20, ymax: 500, xmax: 700 }),
        is_deleted: false,
        deleted_at: None,
        is_wishlist: false,
    }
}

#[tokio::test]
async fn save_and_fetch_round_trip() {
    let pool = test_pool().await;
    let record = sample_record("Navy blazer", Category::Outerwear);
    garments::save_garment(&pool, &record).await.unwrap();

    let loaded = garments::get_garment(&pool, record.id).await.unwrap().unwrap();
    assert_eq!(loaded.id, record.id);
    assert_eq!(loaded.name, "Navy blazer");
    assert_eq!(loaded.category, Category::Outerwear);
    assert_eq!(loaded.price, 120.0);
    assert_eq!(loaded.box2d, record.box2d);
    assert!(!loaded.is_deleted);
    assert!(!loaded.is_wishlist);
}

#[tokio::test]
async fn fetch_all_orders_newest_first() {
    let pool = test_pool().await;

    let mut older = sample_record("Old tee", Category::Tops);
    older.created_at = Utc::now() - Duration::days(2);
    let newer = sample_record("New tee", Category::Tops);

    garments::save_garment(&pool, &older).await.unwrap();
    garments::save_garment(&pool, &newer).await.unwrap();

    let all = garments::get_all_garments(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "New tee");
    assert_eq!(all[1].name, "Old tee");
}

#[tokio::test]
async fn soft_delete_and_restore() {
    let pool = test_pool().await;
    let record = sample_record("Denim jacket", Category::Outerwear);
    garments::save_garment(&pool, &record).await.unwrap();

    assert!(garments::soft_delete_garment(&pool, record.id).await.unwrap());
    let binned = garments::get_garment(&pool, record.id).await.unwrap().unwrap();
    assert!(binned.is_deleted);
    assert!(binned.deleted_at.is_some());
    assert!(CatalogView::Bin.contains(&binned));

    // Already deleted: no row matches
    assert!(!garments::soft_delete_garment(&pool, record.id).await.unwrap());

    assert!(garments::restore_garment(&pool, record.id).await.unwrap());
    let restored = garments::get_garment(&pool, record.id).await.unwrap().unwrap();
    assert!(!restored.is_deleted);
    assert!(restored.deleted_at.is_none());
    assert!(CatalogView::Wardrobe.contains(&restored));

    // Restore requires the record to be in the bin
    assert!(!garments::restore_garment(&pool, record.id).await.unwrap());
}

#[tokio::test]
async fn soft_delete_from_wishlist_lands_in_bin() {
    let pool = test_pool().await;
    let record = sample_record("Silk scarf", Category::Accessories);
    garments::save_garment(&pool, &record).await.unwrap();

    assert!(garments::move_to_wishlist(&pool, record.id).await.unwrap());
    assert!(garments::soft_delete_garment(&pool, record.id).await.unwrap());

    let binned = garments::get_garment(&pool, record.id).await.unwrap().unwrap();
    // The wishlist flag survives, but the bin view takes precedence.
    assert!(binned.is_wishlist);
    assert!(CatalogView::Bin.contains(&binned));
    assert!(!CatalogView::Wishlist.contains(&binned));
}

#[tokio::test]
async fn permanent_delete_is_irreversible_and_requires_bin() {
    let pool = test_pool().await;
    let record = sample_record("Worn-out sneakers", Category::Shoes);
    garments::save_garment(&pool, &record).await.unwrap();

    // Active records cannot be permanently deleted
    assert!(!garments::permanent_delete_garment(&pool, record.id).await.unwrap());

    garments::soft_delete_garment(&pool, record.id).await.unwrap();
    assert!(garments::permanent_delete_garment(&pool, record.id).await.unwrap());

    assert!(garments::get_garment(&pool, record.id).await.unwrap().is_none());
    let all = garments::get_all_garments(&pool).await.unwrap();
    assert!(all.iter().all(|g| g.id != record.id));
}

#[tokio::test]
async fn wishlist_round_trip_preserves_other_fields() {
    let pool = test_pool().await;
    let record = sample_record("Linen dress", Category::Dresses);
    garments::save_garment(&pool, &record).await.unwrap();

    assert!(garments::move_to_wishlist(&pool, record.id).await.unwrap());
    // Moving to wishlist requires an active record
    assert!(!garments::move_to_wishlist(&pool, record.id).await.unwrap());

    assert!(garments::move_to_wardrobe(&pool, record.id).await.unwrap());
    let back = garments::get_garment(&pool, record.id).await.unwrap().unwrap();

    assert!(CatalogView::Wardrobe.contains(&back));
    assert_eq!(back.name, record.name);
    assert_eq!(back.category, record.category);
    assert_eq!(back.price, record.price);
    assert_eq!(back.wear_count, record.wear_count);
    assert_eq!(back.image_data, record.image_data);
    assert!(!back.is_deleted);
}

#[tokio::test]
async fn wear_count_increments_only_for_non_deleted() {
    let pool = test_pool().await;
    let record = sample_record("Black jeans", Category::Bottoms);
    garments::save_garment(&pool, &record).await.unwrap();

    assert!(garments::increment_wear_count(&pool, record.id).await.unwrap());
    assert!(garments::increment_wear_count(&pool, record.id).await.unwrap());
    let loaded = garments::get_garment(&pool, record.id).await.unwrap().unwrap();
    assert_eq!(loaded.wear_count, 2);

    garments::soft_delete_garment(&pool, record.id).await.unwrap();
    assert!(!garments::increment_wear_count(&pool, record.id).await.unwrap());
}
