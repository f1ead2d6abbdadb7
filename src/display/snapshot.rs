//! Display snapshot published over a watch channel

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::DisplaySink;
use crate::state::AlertState;

/// Everything a display adapter needs to draw
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub timer_text: String,
    pub alert: AlertState,
    pub status_message: Option<String>,
}

/// [`DisplaySink`] that stores updates in a watch channel.
///
/// Receivers are only woken when a value actually changes, so repeated
/// idempotent updates from the presenter cost nothing downstream.
#[derive(Debug, Clone)]
pub struct WatchDisplay {
    tx: watch::Sender<DisplaySnapshot>,
}

impl WatchDisplay {
    pub fn new(tx: watch::Sender<DisplaySnapshot>) -> Self {
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        self.tx.borrow().clone()
    }
}

impl DisplaySink for WatchDisplay {
    fn set_timer_text(&self, text: &str) {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.timer_text == text {
                return false;
            }
            snapshot.timer_text = text.to_string();
            true
        });
    }

    fn set_alert(&self, alert: AlertState) {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.alert == alert {
                return false;
            }
            snapshot.alert = alert;
            true
        });
    }

    fn set_status_message(&self, message: Option<&str>) {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.status_message.as_deref() == message {
                return false;
            }
            snapshot.status_message = message.map(str::to_string);
            true
        });
    }
}
