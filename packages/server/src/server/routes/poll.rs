use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::domains::tasks::StatusChange;
use crate::kernel::CycleOutcome;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct PollResponse {
    outcome: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    changes: Vec<StatusChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl PollResponse {
    fn new(outcome: &'static str) -> Self {
        Self {
            outcome,
            changes: Vec::new(),
            error: None,
        }
    }
}

/// Run a poll cycle now instead of waiting for the next tick.
///
/// Answers 409 Conflict when a cycle is already running. A client that
/// disconnects early does not cancel the cycle.
pub async fn poll_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<PollResponse>) {
    match state.poller.run_cycle().await {
        CycleOutcome::Completed { changes } => (
            StatusCode::OK,
            Json(PollResponse {
                changes,
                ..PollResponse::new("completed")
            }),
        ),
        CycleOutcome::Skipped => (StatusCode::CONFLICT, Json(PollResponse::new("skipped"))),
        CycleOutcome::NotReady => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(PollResponse::new("not_ready")),
        ),
        CycleOutcome::Failed(e) => (
            StatusCode::BAD_GATEWAY,
            Json(PollResponse {
                error: Some(format!("{:#}", e)),
                ..PollResponse::new("failed")
            }),
        ),
    }
}
