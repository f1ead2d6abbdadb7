//! Service Restarter - periodically restarts a managed service
//!
//! A scheduler restarts the service on a fixed interval or on request, while
//! a countdown presenter shows the time left and flashes an alert when the
//! restart is due.

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, ControlError, DisplayError, RestartStageError};
pub use state::{AppState, RestartPolicy};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
