//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for shared HMDB operations
pub type Result<T> = std::result::Result<T, HmdbError>;

/// Errors raised outside the individual extractors, e.g. by output sinks
#[derive(Error, Debug)]
pub enum HmdbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
