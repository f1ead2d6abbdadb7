//! Main application state shared by the background tasks and the API

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Mutex,
    },
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::{Baseline, RestartPolicy};
use crate::{
    display::{DisplaySnapshot, WatchDisplay},
    services::RestartOutcome,
    utils::Shutdown,
};

/// A request for an immediate restart cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualRestart;

/// What happened to a manual restart request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualRestartRequest {
    /// A cycle starts after this request; if a scheduled cycle claimed the
    /// slot at the same moment, that cycle serves the request
    Accepted,
    /// A cycle is running or already pending; request dropped
    Busy,
    /// Shutdown requested; nothing is sent to the scheduler any more
    ShuttingDown,
}

/// Outcome of the most recent restart cycle
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub outcome: RestartOutcome,
    pub finished_at: DateTime<Utc>,
}

/// Shared state wiring the scheduler, the countdown presenter and the
/// display adapters together
#[derive(Debug)]
pub struct AppState {
    policy: RestartPolicy,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Stop flag, checked before every send into the scheduler
    shutdown: Shutdown,
    /// Single-slot manual restart channel into the scheduler
    restart_tx: mpsc::Sender<ManualRestart>,
    /// Set from request acceptance until the cycle has been re-armed
    restart_in_flight: AtomicBool,
    /// Baseline remaining time, written by the scheduler on expiry and after every reset
    baseline_tx: watch::Sender<Baseline>,
    /// Presenter output consumed by display adapters
    display: WatchDisplay,
    /// Restart tracking
    last_outcome: Mutex<Option<OutcomeRecord>>,
    next_restart_at: Mutex<Option<DateTime<Utc>>>,
    completed_cycles: AtomicU64,
}

impl AppState {
    /// Create the state and the receiving end of the manual restart channel,
    /// which belongs to the scheduler task
    pub fn new(
        policy: RestartPolicy,
        host: String,
        port: u16,
    ) -> (Self, mpsc::Receiver<ManualRestart>) {
        let (restart_tx, restart_rx) = mpsc::channel(1);
        let (baseline_tx, _) = watch::channel(Baseline::new(policy.interval()));
        let (display_tx, _) = watch::channel(DisplaySnapshot::default());

        let state = Self {
            policy,
            start_time: Instant::now(),
            port,
            host,
            shutdown: Shutdown::new(),
            restart_tx,
            restart_in_flight: AtomicBool::new(false),
            baseline_tx,
            display: WatchDisplay::new(display_tx),
            last_outcome: Mutex::new(None),
            next_restart_at: Mutex::new(None),
            completed_cycles: AtomicU64::new(0),
        };

        (state, restart_rx)
    }

    pub fn policy(&self) -> &RestartPolicy {
        &self.policy
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Ask the scheduler for an immediate restart without ever blocking.
    ///
    /// At most one request is in flight; further requests are rejected as
    /// busy until the scheduler has finished the cycle and re-armed.
    pub fn request_manual_restart(&self) -> ManualRestartRequest {
        if self.shutdown.is_triggered() {
            debug!("Manual restart ignored, shutting down");
            return ManualRestartRequest::ShuttingDown;
        }

        if self
            .restart_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("Manual restart ignored, a restart is already in progress");
            return ManualRestartRequest::Busy;
        }

        match self.restart_tx.try_send(ManualRestart) {
            Ok(()) => {
                info!("Manual restart requested");
                ManualRestartRequest::Accepted
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                // The scheduler has not drained an earlier request yet; it
                // clears the flag once that cycle is done.
                info!("Manual restart ignored, a restart is already pending");
                ManualRestartRequest::Busy
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.restart_in_flight.store(false, Ordering::Release);
                warn!("Manual restart ignored, scheduler has exited");
                ManualRestartRequest::ShuttingDown
            }
        }
    }

    /// Request shutdown of both loops. Returns `true` only the first time.
    pub fn request_stop(&self) -> bool {
        let first = self.shutdown.trigger();
        if first {
            info!("Stop requested");
        } else {
            debug!("Stop already requested");
        }
        first
    }

    pub fn is_restart_in_flight(&self) -> bool {
        self.restart_in_flight.load(Ordering::Acquire)
    }

    /// Mark a cycle as running. Returns `false` if a manual request already
    /// holds the slot, in which case this cycle serves that request.
    pub(crate) fn try_begin_cycle(&self) -> bool {
        self.restart_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn end_cycle(&self) {
        self.restart_in_flight.store(false, Ordering::Release);
    }

    /// Publish a new countdown baseline to the presenter
    pub fn publish_baseline(&self, remaining: Duration) {
        // send_modify never fails, even before the presenter subscribes
        self.baseline_tx.send_modify(|baseline| baseline.remaining = remaining);
    }

    /// Tell the presenter the scheduled deadline has fired
    pub fn mark_expired(&self) {
        self.baseline_tx.send_modify(|baseline| {
            baseline.remaining = Duration::ZERO;
            baseline.expirations += 1;
        });
    }

    pub fn subscribe_baseline(&self) -> watch::Receiver<Baseline> {
        self.baseline_tx.subscribe()
    }

    pub fn baseline(&self) -> Baseline {
        *self.baseline_tx.borrow()
    }

    pub fn display(&self) -> &WatchDisplay {
        &self.display
    }

    pub fn display_snapshot(&self) -> DisplaySnapshot {
        self.display.snapshot()
    }

    /// Record a finished restart cycle
    pub fn record_outcome(&self, outcome: RestartOutcome) {
        self.completed_cycles.fetch_add(1, Ordering::AcqRel);
        if let Ok(mut last) = self.last_outcome.lock() {
            *last = Some(OutcomeRecord {
                outcome,
                finished_at: Utc::now(),
            });
        }
    }

    pub fn last_outcome(&self) -> Option<OutcomeRecord> {
        self.last_outcome.lock().ok().and_then(|last| last.clone())
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles.load(Ordering::Acquire)
    }

    pub fn set_next_restart_at(&self, at: DateTime<Utc>) {
        if let Ok(mut next) = self.next_restart_at.lock() {
            *next = Some(at);
        }
    }

    pub fn next_restart_at(&self) -> Option<DateTime<Utc>> {
        self.next_restart_at.lock().ok().and_then(|next| *next)
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
