use crate::webhook::dispatch::process_event;
use crate::webhook::event::EventPayload;
use crate::webhook::state::ListenerState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Routes: `POST /events`, `GET /status`, 404 for everything else.
pub fn router(state: Arc<ListenerState>) -> Router {
    Router::new()
        .route("/events", post(receive_event))
        .route("/status", get(status))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Always answers 200 `{"status":"ok"}` so the node never treats delivery
/// as failed.
async fn receive_event(
    State(state): State<Arc<ListenerState>>,
    body: Result<Bytes, BytesRejection>,
) -> Json<Value> {
    match body {
        Ok(bytes) => match serde_json::from_slice::<EventPayload>(&bytes) {
            Ok(payload) => {
                process_event(&state, payload);
            }
            Err(e) => warn!("Parse error: {}", e),
        },
        Err(e) => warn!("Parse error: unreadable body: {}", e),
    }
    Json(json!({"status": "ok"}))
}

async fn status(State(state): State<Arc<ListenerState>>) -> impl IntoResponse {
    Json(state.snapshot())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
