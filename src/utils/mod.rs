//! Utility functions module
//!
//! Process signals and the shared stop flag.

pub mod shutdown;
pub mod signals;

// Re-export main items
pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
