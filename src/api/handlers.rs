//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::info;

use crate::{
    display::format_seconds,
    state::{AppState, ManualRestartRequest},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /restart - Request an immediate restart
pub async fn restart_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Restart endpoint called");
    let request = state.request_manual_restart();
    let code = match request {
        ManualRestartRequest::Accepted => StatusCode::ACCEPTED,
        ManualRestartRequest::Busy => StatusCode::CONFLICT,
        ManualRestartRequest::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
    };

    (code, Json(ApiResponse::for_restart(request, state.policy().service_name())))
}

/// Handle POST /stop - Stop the scheduler and countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    info!("Stop endpoint called");
    let message = if state.request_stop() {
        "Stopping restart loop"
    } else {
        "Already stopping"
    };

    Json(ApiResponse::new("stopping", message.to_string()))
}

/// Handle GET /status - Return schedule and countdown state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let policy = state.policy();
    let display = state.display_snapshot();
    let next_restart_at = state.next_restart_at();
    let next_restart_in =
        next_restart_at.map(|at| format_seconds((at - Utc::now()).num_seconds()));

    Json(StatusResponse {
        service: policy.service_name().to_string(),
        interval_seconds: policy.interval().as_secs(),
        hold_seconds: policy.hold_time().as_secs(),
        timer_text: display.timer_text,
        alert: display.alert,
        status_message: display.status_message,
        restart_in_flight: state.is_restart_in_flight(),
        next_restart_at,
        next_restart_in,
        completed_cycles: state.completed_cycles(),
        last_outcome: state.last_outcome(),
        stopping: state.shutdown().is_triggered(),
        uptime: state.get_uptime(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
