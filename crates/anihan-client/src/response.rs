//! The API response envelope.

use crate::FetchError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `{"success": true, "data": ...}` or `{"success": false, "message": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// Parse a response body received with `status`.
    pub fn parse(status: u16, body: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(body).map_err(|e| {
            let text = String::from_utf8_lossy(body);
            let preview: String = text.chars().take(100).collect();
            FetchError::ParseError(format!("HTTP {status}, invalid response format ({e}): {preview}"))
        })
    }

    /// Turn an unsuccessful envelope into an error.
    pub fn error_for_status(self, status: u16) -> Result<Self, FetchError> {
        if self.success && (200..300).contains(&status) {
            Ok(self)
        } else {
            Err(FetchError::HttpError {
                status,
                message: self
                    .message
                    .unwrap_or_else(|| format!("Request failed with status {status}")),
            })
        }
    }

    /// Deserialize the `data` payload.
    pub fn data<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        let data = self.data.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(data).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// The `message`, for responses that carry no data.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}
