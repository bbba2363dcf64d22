//! ÖBB client error types.

use crate::domain::TimeError;

/// Errors from the ÖBB API client and the session manager.
#[derive(Debug, thiserror::Error)]
pub enum OebbError {
    /// HTTP request failed (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider rejected the session credentials
    #[error("unauthorized: the cached session may have expired, retry with --refresh")]
    Unauthorized,

    /// The init handshake failed and no cached session was usable
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Station search returned no candidates
    #[error("no station found for {0:?}")]
    StationNotFound(String),

    /// Response body was not the expected JSON shape
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A timestamp in the response could not be parsed
    #[error(transparent)]
    Time(#[from] TimeError),
}

impl OebbError {
    /// Build a parse error, keeping the start of the offending body.
    pub(crate) fn json(err: impl ToString, body: &str) -> Self {
        OebbError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
