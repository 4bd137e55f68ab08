//! Shared types and database access for the wardrobe service

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod garment;

pub use crate::error::{Error, Result};
