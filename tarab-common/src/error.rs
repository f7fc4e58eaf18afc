//! Common error types for tarab

use thiserror::Error;

/// Common result type for tarab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the catalog, training and generation stores
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or empty required field
    #[error("{0}")]
    Validation(String),

    /// Requested resource not found
    #[error("{0}")]
    NotFound(String),

    /// Resource exists but the requested sub-resource is empty
    #[error("{0}")]
    NoContent(String),

    /// Operation invariant violated (e.g. training start with empty catalog)
    #[error("{0}")]
    Precondition(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
