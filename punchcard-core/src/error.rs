//! Error types for punchcard-core

use thiserror::Error;

/// Main error type for the punchcard-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Period selector rejected before any query
    #[error(transparent)]
    InvalidPeriod(#[from] crate::types::InvalidPeriod),
}

/// Result type alias for punchcard-core
pub type Result<T> = std::result::Result<T, Error>;
