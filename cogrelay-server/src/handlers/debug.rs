//! Diagnostic handlers for operator troubleshooting
//!
//! No role in the primary request path. GET reports which chat settings
//! are present (booleans only); POST performs one round trip with a
//! minimal conversation and returns the raw remote status and body.

use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use cogrelay_core::protocol::{ChatMessage, ChatPayload};
use cogrelay_core::providers::ChatCompletions;
use serde::Deserialize;
use serde_json::{json, Value};

/// `GET /debug/openai`
pub async fn probe_config(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "configured": state.config.chat.presence(),
        "api_version": state.config.chat.api_version,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProbeRequest {
    pub message: String,
}

/// `POST /debug/openai`
pub async fn probe_round_trip(
    State(state): State<SharedState>,
    payload: Result<Json<ProbeRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(probe) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let settings = state.config.chat.require()?;
    if probe.message.trim().is_empty() {
        return Err(ApiError::bad_request("provide a message to send"));
    }

    let target = ChatCompletions::new(settings)?;
    let request = target.build_request(&ChatPayload {
        messages: vec![ChatMessage::user(probe.message)],
        ..Default::default()
    });

    // raw relay on purpose: the operator wants to see exactly what the
    // remote answered, success or not
    let body = serde_json::to_vec(&request).map_err(cogrelay_core::providers::RelayError::from)?;
    let reply = state.relay.execute_raw(&target, body).await?;

    Ok(Json(json!({
        "status": reply.status,
        "body": reply.json_or_raw(),
    })))
}
