//! Service layer for wardrobe-svc

pub mod composer;
pub mod cropper;
pub mod ingest;
pub mod insights;
pub mod vision;
