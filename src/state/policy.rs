//! Restart policy: what to restart and how often

use std::time::Duration;

use crate::error::ConfigError;

/// Immutable restart policy, fixed for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartPolicy {
    service_name: String,
    interval: Duration,
    hold_time: Duration,
}

impl RestartPolicy {
    /// Validate and build a policy
    pub fn new(
        service_name: impl Into<String>,
        interval: Duration,
        hold_time: Duration,
    ) -> Result<Self, ConfigError> {
        let service_name = service_name.into().trim().to_string();
        if service_name.is_empty() {
            return Err(ConfigError::MissingServiceName);
        }
        if interval.is_zero() {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(Self {
            service_name,
            interval,
            hold_time,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Time between scheduled restarts; also the countdown baseline
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Pause between stopping and starting the service
    pub fn hold_time(&self) -> Duration {
        self.hold_time
    }
}
