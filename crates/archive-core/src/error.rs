//! Error types for the archives service.

use thiserror::Error;

/// Result type alias using the archive Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for archive operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(uuid::Uuid),

    /// Invalid input (missing name, negative price, malformed body)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ItemNotFound(_))
    }
}
