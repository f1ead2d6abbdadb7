//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AlertState, ManualRestartRequest, OutcomeRecord};

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
        }
    }

    /// Response for a manual restart request
    pub fn for_restart(request: ManualRestartRequest, service_name: &str) -> Self {
        match request {
            ManualRestartRequest::Accepted => {
                Self::new("accepted", format!("Restart of {} triggered", service_name))
            }
            ManualRestartRequest::Busy => {
                Self::new("busy", "A restart is already in progress".to_string())
            }
            ManualRestartRequest::ShuttingDown => {
                Self::new("shutting_down", "Restarter is shutting down".to_string())
            }
        }
    }
}

/// Current schedule and countdown
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub interval_seconds: u64,
    pub hold_seconds: u64,
    pub timer_text: String,
    pub alert: AlertState,
    pub status_message: Option<String>,
    pub restart_in_flight: bool,
    pub next_restart_at: Option<DateTime<Utc>>,
    /// Wall-clock time left until `next_restart_at`, `00:00` once it is due
    pub next_restart_in: Option<String>,
    pub completed_cycles: u64,
    pub last_outcome: Option<OutcomeRecord>,
    pub stopping: bool,
    pub uptime: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
