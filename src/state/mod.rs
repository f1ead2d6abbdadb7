//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod countdown_state;
pub mod policy;

// Re-export main types
pub use app_state::{AppState, ManualRestart, ManualRestartRequest, OutcomeRecord};
pub use countdown_state::{AlertState, Baseline, CountdownState, TickOutcome};
pub use policy::RestartPolicy;
