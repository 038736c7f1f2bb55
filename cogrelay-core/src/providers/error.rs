//! Relay error types and handling

use crate::config::ConfigError;
use thiserror::Error;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors that can occur while relaying a request to a remote service
///
/// The taxonomy matches what the handler boundary needs to produce: a
/// configuration failure and a transport failure both become a local 500,
/// a remote non-success status is forwarded to the caller unchanged.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Required configuration absent; detected before any outbound call
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed or empty caller payload
    #[error("{0}")]
    BadRequest(String),

    /// The remote service answered with a non-success status. Status and
    /// raw body are preserved so the caller sees exactly what the provider
    /// said.
    #[error("remote service returned status {status}")]
    Remote {
        status: u16,
        body: String,
        url: String,
    },

    /// The outbound call did not complete within the configured bound
    #[error("request to remote service timed out after {0} seconds")]
    Timeout(u64),

    /// Network-level failure: DNS, connect, TLS, broken transfer
    #[error("network error: {0}")]
    Network(String),

    /// Remote returned success but the body was not usable
    #[error("failed to parse remote response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout(crate::config::DEFAULT_TIMEOUT_SECS)
        } else if err.is_decode() {
            RelayError::Parse(err.to_string())
        } else {
            // reqwest errors render without header contents, so API keys
            // cannot surface here
            RelayError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Parse(err.to_string())
    }
}
