//! Relay client implementation using reqwest

use crate::providers::{RelayError, RelayResult, RemoteService};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Default user agent
const USER_AGENT: &str = "cogrelay/0.1.0";

/// Shared HTTP client with connection pooling
///
/// One instance lives in the application state for the whole process.
/// Every outbound call carries an `X-Request-ID` for correlation and is
/// bounded by the configured timeout; failed calls are never retried.
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    timeout: Duration,
}

impl RelayClient {
    /// Create a new relay client with the given per-request timeout
    pub fn new(request_timeout: Duration) -> RelayResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| RelayError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout: request_timeout,
        })
    }

    /// POST a JSON body and parse a JSON reply.
    ///
    /// A non-success remote status becomes [`RelayError::Remote`] carrying
    /// the status and raw body, so the handler can forward both unchanged.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        service: &dyn RemoteService,
        body: &impl Serialize,
    ) -> RelayResult<T> {
        let request_id = Uuid::new_v4();
        debug!(
            "relaying to {} at {} [request_id: {}]",
            service.name(),
            service.url(),
            request_id
        );

        let mut req = self
            .client
            .post(service.url().clone())
            .header("X-Request-ID", request_id.to_string())
            .json(body);
        for (key, value) in service.headers() {
            req = req.header(key, value);
        }

        let response = req
            .send()
            .await
            .map_err(|e| self.map_send_error(e, service, request_id))?;

        let status = response.status();
        if !status.is_success() {
            let url = service.url().to_string();
            let body = response.text().await.unwrap_or_default();
            warn!(
                "{} returned status {} [request_id: {}]",
                service.name(),
                status,
                request_id
            );
            return Err(RelayError::Remote {
                status: status.as_u16(),
                body,
                url,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| RelayError::Network(format!("failed to read response body: {e}")))?;
        let parsed = serde_json::from_str(&text).map_err(|e| {
            error!(
                "unparseable response from {} [request_id: {}]: {}",
                service.name(),
                request_id,
                e
            );
            RelayError::Parse(e.to_string())
        })?;

        info!(
            "relay to {} completed [request_id: {}]",
            service.name(),
            request_id
        );
        Ok(parsed)
    }

    /// POST an opaque body and relay the reply verbatim.
    ///
    /// Used by the pure-proxy paths: the remote's status and bytes come
    /// back untouched whatever they are; only transport failures error.
    pub async fn execute_raw(
        &self,
        service: &dyn RemoteService,
        body: impl Into<reqwest::Body>,
    ) -> RelayResult<RemoteReply> {
        let request_id = Uuid::new_v4();
        debug!(
            "relaying to {} at {} [request_id: {}]",
            service.name(),
            service.url(),
            request_id
        );

        let mut req = self
            .client
            .post(service.url().clone())
            .header("X-Request-ID", request_id.to_string())
            .body(body);
        for (key, value) in service.headers() {
            req = req.header(key, value);
        }

        let response = req
            .send()
            .await
            .map_err(|e| self.map_send_error(e, service, request_id))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Network(format!("failed to read response body: {e}")))?;

        info!(
            "relay to {} completed with status {} [request_id: {}]",
            service.name(),
            status,
            request_id
        );
        Ok(RemoteReply {
            status,
            content_type,
            body: bytes.to_vec(),
        })
    }

    fn map_send_error(
        &self,
        err: reqwest::Error,
        service: &dyn RemoteService,
        request_id: Uuid,
    ) -> RelayError {
        if err.is_timeout() {
            warn!(
                "request to {} timed out [request_id: {}]",
                service.name(),
                request_id
            );
            RelayError::Timeout(self.timeout.as_secs())
        } else if err.is_connect() {
            error!(
                "connection to {} failed [request_id: {}]: {}",
                service.name(),
                request_id,
                err
            );
            RelayError::Network(format!("connection failed: {err}"))
        } else {
            error!(
                "request to {} failed [request_id: {}]: {}",
                service.name(),
                request_id,
                err
            );
            RelayError::Network(err.to_string())
        }
    }
}

/// Verbatim remote reply from [`RelayClient::execute_raw`]
#[derive(Debug, Clone)]
pub struct RemoteReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RemoteReply {
    /// Parse the body as JSON, falling back to `{"raw": <text>}` when the
    /// remote sent something else
    pub fn json_or_raw(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|_| {
            serde_json::json!({ "raw": String::from_utf8_lossy(&self.body) })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_or_raw_with_json_body() {
        let reply = RemoteReply {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: br#"{"ok": true}"#.to_vec(),
        };
        assert_eq!(reply.json_or_raw(), serde_json::json!({"ok": true}));
    }

    #[test]
    fn test_json_or_raw_with_text_body() {
        let reply = RemoteReply {
            status: 502,
            content_type: Some("text/plain".to_string()),
            body: b"bad gateway".to_vec(),
        };
        assert_eq!(
            reply.json_or_raw(),
            serde_json::json!({"raw": "bad gateway"})
        );
    }
}
