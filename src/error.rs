//! Error types shared across the crate

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid or missing startup configuration. Fatal: nothing is scheduled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("service name is required (use --service to specify it)")]
    MissingServiceName,

    #[error("restart interval must be a positive duration")]
    InvalidInterval,

    #[error("service manager '{manager}' is not available: {detail}")]
    ManagerUnavailable { manager: String, detail: String },
}

/// Failure of a single service-control command.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed ({status}), output: {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("{0}")]
    Other(String),
}

/// The stage of a restart cycle that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartStage {
    Stop,
    Start,
}

impl fmt::Display for RestartStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartStage::Stop => write!(f, "stop"),
            RestartStage::Start => write!(f, "start"),
        }
    }
}

/// One stage of a restart cycle failed. Terminal for that cycle only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("restart failed at {stage} stage: {detail}")]
pub struct RestartStageError {
    pub stage: RestartStage,
    pub detail: String,
}

/// The display boundary is unavailable. Never fatal to the scheduler.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}
