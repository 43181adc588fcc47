//! Errors raised by the key-value store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing file could not be created or read at startup.
    #[error("cannot open cache: {0}")]
    Unavailable(String),

    /// A cached entry did not round-trip through JSON.
    #[error("cache entry is not valid JSON: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Reading, writing or locking the store failed after it was opened.
    #[error("cache write failed: {0}")]
    Backend(String),
}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        CacheError::Backend(e.to_string())
    }
}
