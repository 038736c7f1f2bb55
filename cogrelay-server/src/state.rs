//! Shared application state
//!
//! One immutable snapshot per process: the configuration and the pooled
//! relay client. Handlers read it through an `Arc`; nothing here is ever
//! mutated after startup.

use cogrelay_core::config::GatewayConfig;
use cogrelay_core::http::RelayClient;
use cogrelay_core::providers::RelayResult;
use std::sync::Arc;

pub struct AppState {
    pub config: GatewayConfig,
    pub relay: RelayClient,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> RelayResult<Arc<Self>> {
        let relay = RelayClient::new(config.server.request_timeout)?;
        Ok(Arc::new(Self { config, relay }))
    }
}

pub type SharedState = Arc<AppState>;
