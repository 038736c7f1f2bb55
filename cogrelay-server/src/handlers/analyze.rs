//! Image-analysis relay handler

use crate::error::ApiError;
use crate::state::SharedState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use cogrelay_core::providers::FaceDetection;

/// `POST /analyze`
///
/// Pure proxy: the caller's image bytes go out unmodified and the
/// remote's JSON comes back with its original status code, whatever it
/// was. No reinterpretation happens on this path.
pub async fn analyze(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let settings = state.config.face.require()?;
    if body.is_empty() {
        return Err(ApiError::bad_request("no image: POST binary body"));
    }

    let target = FaceDetection::new(settings)?;
    let reply = state.relay.execute_raw(&target, body.to_vec()).await?;

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(reply.json_or_raw())).into_response())
}
