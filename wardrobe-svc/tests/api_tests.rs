//! Router-level API tests
//!
//! Exercises the HTTP surface end to end with an in-memory database and a
//! stub vision backend, using tower's oneshot to drive the router directly.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use wardrobe_common::db::{garments, init_tables};
use wardrobe_common::events::EventBus;
use wardrobe_common::garment::{Category, GarmentRecord};
use wardrobe_svc::models::{FairPriceEstimate, PurchaseChannel};
use wardrobe_svc::services::vision::{DetectedGarment, VisionBackend, VisionError};
use wardrobe_svc::{build_router, AppState};

/// Stub backend: no detections, canned price estimate and suggestion
struct StubVision;

#[async_trait]
impl VisionBackend for StubVision {
    async fn detect_garments(&self, _image_b64: &str) -> Result<Vec<DetectedGarment>, VisionError> {
        Ok(vec![])
    }

    async fn generate_product_shot(
        &self,
        _crop_b64: &str,
        _description: &str,
    ) -> Result<String, VisionError> {
        Err(VisionError::MissingImage)
    }

    async fn estimate_fair_price(
        &self,
        _tag_image_b64: Option<&str>,
        _garment_b64: &str,
        channel: PurchaseChannel,
    ) -> Result<FairPriceEstimate, VisionError> {
        Ok(FairPriceEstimate {
            material: "cotton blend".to_string(),
            base_cost: 18.0,
            fair_price_range: "60-90".to_string(),
            haggle_tip: format!("At a {} start at half the asking price.", channel),
            is_rip_off: false,
        })
    }

    async fn suggest_outfit(
        &self,
        _item_summaries: &[String],
        _weather: &str,
    ) -> Result<String, VisionError> {
        Err(VisionError::MalformedResponse("model down".to_string()))
    }
}

async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_tables(&pool).await.unwrap();
    AppState::new(pool, EventBus::new(100), Arc::new(StubVision))
}

fn sample_record(name: &str, category: Category) -> GarmentRecord {
    GarmentRecord {
        id: Uuid::new_v4(),
        image_data: "aW1hZ2U=".to_string(),
        category,
        name: name.to_string(),
        color: "olive".to_string(),
        material: "cotton".to_string(),
        price: 80.0,
        wear_count: 2,
        created_at: chrono::Utc::now(),
        box2d: None,
        is_deleted: false,
        deleted_at: None,
        is_wishlist: false,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_router(test_state().await);
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "wardrobe-svc");
}

#[tokio::test]
async fn garment_listing_defaults_to_the_wardrobe_view() {
    let state = test_state().await;
    let active = sample_record("chore jacket", Category::Outerwear);
    let mut wished = sample_record("dream coat", Category::Outerwear);
    wished.is_wishlist = true;
    garments::save_garment(&state.db, &active).await.unwrap();
    garments::save_garment(&state.db, &wished).await.unwrap();

    let app = build_router(state);
    let response = app.clone().oneshot(get("/api/garments")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "chore jacket");

    let response = app
        .oneshot(get("/api/garments?view=wishlist"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["name"], "dream coat");
}

#[tokio::test]
async fn unknown_view_is_a_bad_request() {
    let app = build_router(test_state().await);
    let response = app
        .oneshot(get("/api/garments?view=attic"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn category_filter_applies_within_the_view() {
    let state = test_state().await;
    garments::save_garment(&state.db, &sample_record("tee", Category::Tops))
        .await
        .unwrap();
    garments::save_garment(&state.db, &sample_record("jeans", Category::Bottoms))
        .await
        .unwrap();

    let app = build_router(state);
    let response = app
        .oneshot(get("/api/garments?category=Bottoms"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "jeans");
}

#[tokio::test]
async fn mutations_distinguish_missing_from_precondition_failure() {
    let state = test_state().await;
    let record = sample_record("loafers", Category::Shoes);
    garments::save_garment(&state.db, &record).await.unwrap();
    let app = build_router(state);

    // Unknown garment: 404
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/garments/{}/restore", Uuid::new_v4()),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Existing but not binned: restore violates its precondition, 409
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/garments/{}/restore", record.id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Valid delete then wear on a binned garment: 409
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/garments/{}/delete", record.id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            &format!("/api/garments/{}/wear", record.id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn settings_round_trip_never_echoes_the_key() {
    let app = build_router(test_state().await);

    let response = app
        .clone()
        .oneshot(get("/api/settings/gemini_api_key"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["configured"], false);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/settings/gemini_api_key",
            json!({"api_key": "test-key-123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/api/settings/gemini_api_key"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["configured"], true);
    assert!(body.get("api_key").is_none());
}

#[tokio::test]
async fn whitespace_api_key_is_rejected() {
    let app = build_router(test_state().await);
    let response = app
        .oneshot(post_json(
            "/api/settings/gemini_api_key",
            json!({"api_key": "   "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_ingest_session_is_not_found() {
    let app = build_router(test_state().await);
    let response = app
        .oneshot(get(&format!("/api/ingest/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn ingest_accepts_and_reports_the_new_session() {
    let app = build_router(test_state().await);
    let response = app
        .oneshot(post_json("/api/ingest", json!({"image": "aGVsbG8="})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = body_json(response).await;
    assert_eq!(body["state"], "SCANNING");
    assert!(body["session_id"].as_str().is_some());
}

#[tokio::test]
async fn empty_outfit_log_is_a_harmless_no_op() {
    let app = build_router(test_state().await);
    let response = app
        .oneshot(post_json(
            "/api/composer/log",
            json!({"top": null, "bottom": null}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["logged_count"], 0);
}

#[tokio::test]
async fn outfit_log_counts_each_slot_once() {
    let state = test_state().await;
    let top = sample_record("tee", Category::Tops);
    let bottom = sample_record("jeans", Category::Bottoms);
    garments::save_garment(&state.db, &top).await.unwrap();
    garments::save_garment(&state.db, &bottom).await.unwrap();
    let db = state.db.clone();

    let app = build_router(state);
    let response = app
        .oneshot(post_json(
            "/api/composer/log",
            json!({"top": top.id, "bottom": bottom.id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["logged_count"], 2);

    let worn = garments::get_garment(&db, top.id).await.unwrap().unwrap();
    assert_eq!(worn.wear_count, 3);
}

#[tokio::test]
async fn price_analysis_passes_through_the_estimate() {
    let app = build_router(test_state().await);
    let response = app
        .oneshot(post_json(
            "/api/price/analyze",
            json!({
                "garment_image": "aW1hZ2U=",
                "channel": "street_shop"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["material"], "cotton blend");
    assert_eq!(body["is_rip_off"], false);
}

#[tokio::test]
async fn suggestion_degrades_to_a_canned_line() {
    let state = test_state().await;
    garments::save_garment(&state.db, &sample_record("tee", Category::Tops))
        .await
        .unwrap();

    let app = build_router(state);
    let response = app
        .oneshot(get("/api/suggestion?weather=22C%20sunny"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["from_model"], false);
    assert!(body["suggestion"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn suggestion_with_empty_wardrobe_skips_the_model() {
    let app = build_router(test_state().await);
    let response = app.oneshot(get("/api/suggestion")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["from_model"], false);
}
