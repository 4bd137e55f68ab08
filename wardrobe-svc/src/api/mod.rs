//! HTTP API handlers for wardrobe-svc

pub mod catalog;
pub mod composer;
pub mod health;
pub mod ingest;
pub mod pricing;
pub mod settings;
pub mod sse;
pub mod suggest;

pub use catalog::catalog_routes;
pub use composer::composer_routes;
pub use health::health_routes;
pub use ingest::ingest_routes;
pub use pricing::pricing_routes;
pub use settings::settings_routes;
pub use sse::ingest_event_stream;
pub use suggest::suggestion_routes;
