//! Error types for the Spindle SDK

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced to SDK callers.
///
/// Authorization failures that the client recovers from transparently
/// (single refresh-and-replay) never reach the caller; everything here is
/// a final outcome.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure from the underlying HTTP client
    #[error("http transport error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The server rejected the credential (401) and no further recovery
    /// is possible for this request
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The session could not be renewed; stored tokens have been cleared
    #[error("session expired: {message}")]
    SessionExpired { message: String },

    /// The credential is valid but lacks permission (403)
    #[error("access forbidden: {message}")]
    Authorization { message: String },

    /// Resource does not exist (404)
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// The request was malformed (400)
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// Too many requests (429)
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Request or response body could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else, including unexpected status codes
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Whether retrying the same request later could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded => true,
            Self::HttpClient(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Whether this failure ends the authenticated session
    pub fn is_session_terminal(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}

/// Error envelope returned by the API on non-success statuses.
///
/// Same shape as the success envelope, with `status: false` and no data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: bool,
    pub status_code: i64,
    pub message: String,
}
