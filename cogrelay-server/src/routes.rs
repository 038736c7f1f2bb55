//! Route table and middleware stack

use crate::handlers;
use crate::state::SharedState;
use axum::extract::DefaultBodyLimit;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Inbound bodies are capped well above any realistic payload; image
/// uploads are the largest thing this gateway accepts.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(handlers::health))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/speak", post(handlers::speak::speak))
        .route("/analyze", post(handlers::analyze::analyze))
        .route(
            "/debug/openai",
            get(handlers::debug::probe_config).post(handlers::debug::probe_round_trip),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
