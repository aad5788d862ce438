// src/error.rs

use thiserror::Error;

/// Core error types for differ
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed package inventory
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No release with the given digest
    #[error("No release found with digest {0}")]
    ReleaseNotFound(String),
}

/// Result type alias using differ's Error type
pub type Result<T> = std::result::Result<T, Error>;
