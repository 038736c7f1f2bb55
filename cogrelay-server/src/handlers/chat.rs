//! Chat relay handler

use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use cogrelay_core::protocol::{ChatPayload, CompletionResponse};
use cogrelay_core::providers::{ChatCompletions, RelayError};
use serde_json::{json, Value};

/// `POST /api/chat`
///
/// The configuration gate runs first: a misconfigured process never
/// issues an outbound call. An empty conversation is likewise rejected
/// before any relay happens.
pub async fn chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let settings = state.config.chat.require()?;
    if payload.is_empty() {
        return Err(ApiError::bad_request(
            "conversation is empty: provide messages or chatHistory",
        ));
    }

    let target = ChatCompletions::new(settings)?;
    let request = target.build_request(&payload);
    let response: CompletionResponse = state.relay.execute_json(&target, &request).await?;

    let reply = response.first_content().ok_or_else(|| {
        RelayError::Parse("remote response contained no completion choices".to_string())
    })?;

    // both key names, for caller compatibility
    Ok(Json(json!({ "reply": reply, "message": reply })))
}
