//! Data models for wardrobe-svc

pub mod ingest_session;
pub mod pricing;

pub use ingest_session::{IngestSession, IngestState, ReviewItem};
pub use pricing::{FairPriceEstimate, PurchaseChannel};
