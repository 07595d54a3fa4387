//! Error types for the feed wire format.

use thiserror::Error;

/// Errors that can occur while encoding or decoding feed payloads.
#[derive(Debug, Error)]
pub enum TypesError {
    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Value is well-formed but not acceptable
    #[error("invalid data: {0}")]
    InvalidData(String),
}
