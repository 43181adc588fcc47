//! Failures of an API call as seen by the client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection refused or timed out. Collection reads fall back to the cache.
    #[error("server unreachable: {0}")]
    Offline(String),

    #[error("request could not be sent: {0}")]
    RequestError(String),

    /// The server answered with a non-2xx status or `success: false`.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("unexpected response: {0}")]
    ParseError(String),

    #[error("invalid JSON: {0}")]
    JsonError(String),

    #[error("cache error: {0}")]
    Cache(#[from] anihan_cache::CacheError),
}

impl FetchError {
    pub fn is_offline(&self) -> bool {
        matches!(self, FetchError::Offline(_))
    }

    /// Status code carried by [`FetchError::HttpError`].
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            FetchError::Offline(e.to_string())
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}
