//! Request handlers
//!
//! Each handler is one request → forward → respond cycle; shared plumbing
//! lives in `cogrelay-core`.

pub mod analyze;
pub mod chat;
pub mod debug;
pub mod speak;

use axum::response::Json;
use serde_json::{json, Value};

/// Liveness check; independent of configuration state
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
