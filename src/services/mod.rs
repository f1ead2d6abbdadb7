//! Managed service control module
//!
//! The host-facing stop/start boundary and the restart cycle built on it.

pub mod control;
pub mod restart;

#[cfg(test)]
pub(crate) mod mock;

// Re-export main items
pub use control::{ServiceControl, ServiceManager, SystemServiceControl};
pub use restart::{perform_restart, RestartOutcome};
