//! Common error types for the wardrobe service
//!
//! Only the failure classes this workspace actually produces: database
//! access, configuration resolution, input validation, and internal
//! invariant breaks (malformed rows, serialization).

use thiserror::Error;

/// Common result type for wardrobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared between the service crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (malformed stored data, serialization failure)
    #[error("Internal error: {0}")]
    Internal(String),
}
