use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Non-2xx reply. `error` and `reason` come from the CouchDB error body
    /// when there is one.
    #[error("API error: {status} - {error}: {reason}")]
    ApiError {
        status: u16,
        error: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct CouchErrorBody {
    error: String,
    #[serde(default)]
    reason: String,
}

impl ClientError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Build an `ApiError` from a failed response. Bodies that are not a
    /// CouchDB error document are kept as the reason.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let (error, reason) = match serde_json::from_str::<CouchErrorBody>(body) {
            Ok(parsed) => (parsed.error, parsed.reason),
            Err(_) => (
                status.canonical_reason().unwrap_or("unknown").to_string(),
                match body.trim() {
                    "" => "empty response".to_string(),
                    text => text.to_string(),
                },
            ),
        };
        Self::ApiError {
            status: status.as_u16(),
            error,
            reason,
        }
    }

    /// CouchDB revision conflict, e.g. a shard map document changed between
    /// read and write.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ApiError { status: 409, .. })
    }
}
