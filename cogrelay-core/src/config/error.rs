//! Configuration error types

use thiserror::Error;

/// Errors surfaced by the configuration layer
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required settings are absent for the requested operation.
    ///
    /// Presence is checked at request time, not at load time, so the
    /// affected handler can fail fast without attempting an outbound call.
    #[error("missing configuration: {}", .names.join(", "))]
    MissingSettings { names: Vec<String> },

    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },

    #[error("invalid endpoint URL in {name}: {message}")]
    InvalidEndpoint { name: String, message: String },
}

impl ConfigError {
    /// Build a `MissingSettings` error from the variables that were absent
    pub fn missing(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::MissingSettings {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
