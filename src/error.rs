//! Error types for repoprofile
//!
//! One error enum covering all failure modes of a profile build. Uses
//! thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for repoprofile operations
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Error type for profile aggregation
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Non-2xx reply from an upstream API. Carries the upstream status so
    /// the HTTP boundary can mirror it back to the caller.
    #[error("Upstream error on {routine}: HTTP {status}: {body}")]
    Upstream {
        routine: String,
        status: u16,
        body: String,
    },

    /// Pagination safety guard tripped; the upstream never returned an
    /// empty page within the configured bound.
    #[error("Page guard tripped on {routine}: more than {limit} pages")]
    PageLimit { routine: String, limit: u32 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request errors (connect failures, timeouts, bad transport)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProfileError {
    /// The upstream status code to mirror to the caller, when the failure
    /// was an upstream HTTP error. Network, parse, and guard failures
    /// return `None` and surface as generic server errors instead.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProfileError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
