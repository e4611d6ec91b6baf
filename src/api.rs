//! HTTP API endpoints.
//!
//! Read-only session status for operators and dashboards.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::state::AppState;

/// Current phase, round progress and participants.
///
/// GET /api/session
pub async fn session_snapshot(State(state): State<Arc<AppState>>) -> Response {
    match state.snapshot().await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => {
            tracing::error!("Session snapshot unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "Session is not running").into_response()
        }
    }
}
