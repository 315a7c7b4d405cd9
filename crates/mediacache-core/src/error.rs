//! Error types for mediacache-core

use thiserror::Error;

/// Result type alias using mediacache-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the cache helper functions
///
/// `RetryableDeferred` never produces these: failures of a deferred value are
/// the producer's own error type, passed through unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// A character range reaches past the end of the text
    #[error("Invalid range: {length} characters at {start} exceed text of {len} characters")]
    InvalidRange {
        start: usize,
        length: usize,
        len: usize,
    },

    /// A value expected to be a key-value object was something else
    #[error("Expected a key-value object, found {found}")]
    NotAnObject { found: String },

    /// JSON conversion error
    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),

    /// Byte buffer is not valid UTF-8
    #[error("Invalid UTF-8 data: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create an invalid range error
    pub fn invalid_range(start: usize, length: usize, len: usize) -> Self {
        Self::InvalidRange { start, length, len }
    }

    /// Create a not-an-object error from a short description of the value found
    pub fn not_an_object(found: impl Into<String>) -> Self {
        Self::NotAnObject {
            found: found.into(),
        }
    }
}
