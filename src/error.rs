//! # Error Types
//!
//! Custom error types for the DShot encoder using `thiserror`.

use thiserror::Error;

/// Main error type for the DShot encoder
#[derive(Debug, Error)]
pub enum DshotError {
    /// Missing or malformed construction input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Allocation failure for an encoder or channel buffer
    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    /// A delegate encoder could not be created
    #[error("Failed to create {delegate} encoder: {source}")]
    DelegateConstructionFailed {
        delegate: &'static str,
        #[source]
        source: Box<DshotError>,
    },

    /// Malformed symbol stream (decoder side)
    #[error("DShot protocol error: {0}")]
    Protocol(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Capture record serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<std::collections::TryReserveError> for DshotError {
    fn from(e: std::collections::TryReserveError) -> Self {
        DshotError::OutOfMemory(e.to_string())
    }
}

/// Result type alias for the DShot encoder
pub type Result<T> = std::result::Result<T, DshotError>;
