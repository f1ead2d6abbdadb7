//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{error::ConfigError, services::ServiceManager, state::RestartPolicy};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "service-restarter")]
#[command(about = "Periodically restarts a managed service with a live countdown")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Name of the service to restart
    #[arg(short, long)]
    pub service: Option<String>,

    /// Restart interval in minutes
    #[arg(short, long, default_value = "60")]
    pub interval: u64,

    /// Time to wait after stopping the service, in seconds
    #[arg(long, default_value = "2")]
    pub hold: u64,

    /// Run without the terminal countdown display
    #[arg(long)]
    pub headless: bool,

    /// Service manager used to stop and start the service
    /// [default: net on Windows, systemctl elsewhere]
    #[arg(short, long, value_enum)]
    pub manager: Option<ServiceManager>,

    /// Port for the control API
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address for the control API
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Validate the scheduling settings
    pub fn policy(&self) -> Result<RestartPolicy, ConfigError> {
        let service = self.service.as_deref().unwrap_or_default();
        let interval = Duration::from_secs(self.interval.saturating_mul(60));
        RestartPolicy::new(service, interval, Duration::from_secs(self.hold))
    }

    pub fn manager(&self) -> ServiceManager {
        self.manager.unwrap_or_else(ServiceManager::platform_default)
    }

    /// Get the API address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
