//! Error-to-response mapping at the handler boundary
//!
//! Every failure becomes a JSON body with the appropriate status code;
//! remote non-success statuses are forwarded unchanged, everything local
//! is a 400 or 500. Secrets never reach a response: the relay error
//! messages carry no header contents.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use cogrelay_core::config::ConfigError;
use cogrelay_core::providers::RelayError;
use serde_json::json;

/// Wrapper turning [`RelayError`] into an HTTP response
pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self(RelayError::Config(err))
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(RelayError::BadRequest(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            RelayError::Config(err) => {
                tracing::error!("configuration error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": err.to_string() }),
                )
            }
            RelayError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            RelayError::Remote { status, body, url } => {
                // forward the provider's status and raw body unchanged
                let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (code, json!({ "error": body, "status": status, "url": url }))
            }
            err @ (RelayError::Timeout(_) | RelayError::Network(_) | RelayError::Parse(_)) => {
                tracing::error!("relay failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": err.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
