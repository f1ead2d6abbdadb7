//! Background tasks module
//!
//! The restart scheduler and the countdown presenter run alongside the HTTP
//! server and communicate only through [`AppState`](crate::state::AppState).

pub mod countdown;
pub mod scheduler;

// Re-export main functions
pub use countdown::{countdown_task, BLINK_PERIOD, TICK_PERIOD};
pub use scheduler::scheduler_task;
