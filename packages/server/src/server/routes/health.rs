use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::kernel::{PollerState, PollerStats};
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    poller: PollerStats,
}

/// Health check endpoint
///
/// Returns 200 OK once the initial snapshot is loaded, 503 Service
/// Unavailable before that.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let stats = state.poller.stats();

    let (status, label) = match stats.state {
        PollerState::Uninitialized => (StatusCode::SERVICE_UNAVAILABLE, "starting"),
        PollerState::Ready | PollerState::CycleRunning => (StatusCode::OK, "ok"),
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            poller: stats,
        }),
    )
}
