//! Display boundary
//!
//! The countdown presenter publishes through [`DisplaySink`]; adapters (the
//! terminal renderer, the HTTP status endpoint) read the resulting snapshot.

pub mod format;
pub mod snapshot;
pub mod terminal;

pub use format::{format_remaining, format_seconds};
pub use snapshot::{DisplaySnapshot, WatchDisplay};
pub use terminal::terminal_display_task;

use crate::state::AlertState;

/// One-way display updates. Implementations must not block.
pub trait DisplaySink: Send + Sync {
    fn set_timer_text(&self, text: &str);

    fn set_alert(&self, alert: AlertState);

    /// `None` clears the notice
    fn set_status_message(&self, message: Option<&str>);
}
