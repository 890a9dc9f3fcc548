//! Adapter error types and their HTTP mapping.
//!
//! Every upstream failure on a GET route is a hard failure surfaced as a 5xx
//! with an `{"error": ...}` body; nothing is retried or partially returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

/// Request-level errors
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The proxy could not be reached or the exchange broke mid-way
    #[error("upstream request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The proxy did not answer within the configured timeout
    #[error("upstream request to {url} timed out")]
    Timeout { url: String },

    /// The proxy answered a GET with a non-2xx status
    #[error("upstream {url} returned HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    /// The proxy body is not valid JSON
    #[error("upstream {url} returned malformed JSON: {reason}")]
    MalformedJson { url: String, reason: String },

    /// The proxy body is JSON but lacks the fields the reshape needs
    #[error("unexpected upstream response shape: {0}")]
    UnexpectedShape(String),

    /// The upstream URL could not be assembled
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

impl AdapterError {
    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdapterError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!(status = status.as_u16(), error = %self, "Relay failed");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type for relay operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Process-level errors (start-up, bind, serve)
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Config(#[from] crate::domain::config::ConfigError),

    #[error("failed to build upstream client: {0}")]
    Client(String),

    #[error("server bind error: {0}")]
    Bind(String),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
