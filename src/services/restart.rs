//! A single restart cycle: stop, hold, start

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{error, info};

use super::ServiceControl;
use crate::error::{RestartStage, RestartStageError};

/// Result of one restart cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RestartOutcome {
    Success,
    Failure { stage: RestartStage, detail: String },
}

impl RestartOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RestartOutcome::Success)
    }

    pub fn into_result(self) -> Result<(), RestartStageError> {
        match self {
            RestartOutcome::Success => Ok(()),
            RestartOutcome::Failure { stage, detail } => Err(RestartStageError { stage, detail }),
        }
    }
}

/// Stop the service, wait `hold_time`, start it again.
///
/// A stop failure aborts the cycle without attempting a start. Nothing is
/// retried here; the next scheduled or manual cycle is the retry.
pub async fn perform_restart(
    service_name: &str,
    hold_time: Duration,
    control: &dyn ServiceControl,
) -> RestartOutcome {
    info!("Stopping service: {}", service_name);
    if let Err(e) = control.stop(service_name).await {
        error!(
            "Error stopping service {}: {} (service may be stopped but not restarted)",
            service_name, e
        );
        return RestartOutcome::Failure {
            stage: RestartStage::Stop,
            detail: e.to_string(),
        };
    }

    info!("Waiting {:?} before starting {}", hold_time, service_name);
    sleep(hold_time).await;

    info!("Starting service: {}", service_name);
    if let Err(e) = control.start(service_name).await {
        error!("Error starting service {}: {}", service_name, e);
        return RestartOutcome::Failure {
            stage: RestartStage::Start,
            detail: e.to_string(),
        };
    }

    info!("Service restart complete: {}", service_name);
    RestartOutcome::Success
}
