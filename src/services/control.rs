//! Service control: stopping and starting the managed service

use async_trait::async_trait;
use clap::ValueEnum;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{ConfigError, ControlError};

/// The two calls a restart cycle needs from the host
#[async_trait]
pub trait ServiceControl: Send + Sync {
    async fn stop(&self, service_name: &str) -> Result<(), ControlError>;

    async fn start(&self, service_name: &str) -> Result<(), ControlError>;
}

/// Host facility used to control services
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceManager {
    /// systemd's `systemctl stop|start <unit>`
    Systemctl,
    /// Windows `net stop|start <service>`
    Net,
}

impl ServiceManager {
    /// `net` on Windows, `systemctl` everywhere else
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            ServiceManager::Net
        } else {
            ServiceManager::Systemctl
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            ServiceManager::Systemctl => "systemctl",
            ServiceManager::Net => "net",
        }
    }

    fn probe_args(self) -> &'static [&'static str] {
        match self {
            ServiceManager::Systemctl => &["--version"],
            ServiceManager::Net => &["help"],
        }
    }

    /// Check that the manager's command can be executed at all
    pub async fn check_available(self) -> Result<(), ConfigError> {
        Command::new(self.program())
            .args(self.probe_args())
            .output()
            .await
            .map_err(|e| ConfigError::ManagerUnavailable {
                manager: self.program().to_string(),
                detail: e.to_string(),
            })?;

        info!("{} is available", self.program());
        Ok(())
    }
}

/// [`ServiceControl`] backed by the host's service manager command
#[derive(Debug, Clone)]
pub struct SystemServiceControl {
    manager: ServiceManager,
}

impl SystemServiceControl {
    pub fn new(manager: ServiceManager) -> Self {
        Self { manager }
    }

    async fn run(&self, action: &str, service_name: &str) -> Result<(), ControlError> {
        let program = self.manager.program();
        let command = format!("{} {} {}", program, action, service_name);
        debug!("Executing {}", command);

        let output = Command::new(program)
            .args([action, service_name])
            .output()
            .await
            .map_err(|source| ControlError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(ControlError::CommandFailed {
                command,
                status: output.status.to_string(),
                output: combined.trim().to_string(),
            });
        }

        debug!("{} succeeded", command);
        Ok(())
    }
}

#[async_trait]
impl ServiceControl for SystemServiceControl {
    async fn stop(&self, service_name: &str) -> Result<(), ControlError> {
        self.run("stop", service_name).await
    }

    async fn start(&self, service_name: &str) -> Result<(), ControlError> {
        self.run("start", service_name).await
    }
}
