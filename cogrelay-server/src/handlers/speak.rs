//! Speech-synthesis relay handler

use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use cogrelay_core::providers::{RelayError, RemoteService, SpeechSynthesis};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
    pub voice: Option<String>,
    pub format: Option<String>,
}

/// `POST /api/speak`
///
/// Wraps the text in SSML, relays it to the synthesis endpoint, and
/// returns the audio bytes. Remote failures are forwarded with the
/// remote's status, like the chat path.
pub async fn speak(
    State(state): State<SharedState>,
    payload: Result<Json<SpeakRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let settings = state.config.speech.require()?;
    if request.text.trim().is_empty() {
        return Err(ApiError::bad_request("no text: provide text to synthesize"));
    }

    let target = SpeechSynthesis::new(
        settings,
        request.voice.as_deref(),
        request.format.as_deref(),
    )?;
    let ssml = target.ssml(&request.text);
    let reply = state.relay.execute_raw(&target, ssml).await?;

    if !(200..300).contains(&reply.status) {
        return Err(RelayError::Remote {
            status: reply.status,
            body: String::from_utf8_lossy(&reply.body).into_owned(),
            url: target.url().to_string(),
        }
        .into());
    }

    Ok((
        [
            (header::CONTENT_TYPE, target.audio_content_type()),
            (header::CACHE_CONTROL, "no-store"),
        ],
        reply.body,
    )
        .into_response())
}
