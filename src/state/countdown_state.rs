//! Countdown state and the alert state machine
//!
//! ```text
//!   tick (1 -> 0) or expire()      blink            blink
//! Normal ───────────────────► AlertOn ───► AlertOff ───► AlertOn ...
//!   ▲                             │           │
//!   └──────── reset(baseline) ────┴───────────┘
//! ```
//!
//! `Normal` holds exactly while `remaining > 0`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Visual alert indicator driven by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    #[default]
    Normal,
    AlertOn,
    AlertOff,
}

impl AlertState {
    pub fn is_alerting(self) -> bool {
        !matches!(self, AlertState::Normal)
    }
}

/// What a one-unit tick did to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down
    Counting,
    /// Remaining just reached zero. Returned once per expiry.
    Expired,
    /// Already at zero, waiting for a reset
    Holding,
}

/// Countdown baseline published by the scheduler.
///
/// `expirations` counts scheduled deadlines that have fired. The presenter
/// compares it with the last value it saw, so an expiry followed quickly by
/// a fresh baseline is still shown even if the watch channel coalesced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub remaining: Duration,
    pub expirations: u64,
}

impl Baseline {
    pub fn new(remaining: Duration) -> Self {
        Self {
            remaining,
            expirations: 0,
        }
    }
}

/// Countdown owned by the presenter task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    remaining: Duration,
    alert: AlertState,
}

impl CountdownState {
    pub fn new(baseline: Duration) -> Self {
        let mut state = Self {
            remaining: Duration::ZERO,
            alert: AlertState::Normal,
        };
        state.reset(baseline);
        state
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn alert(&self) -> AlertState {
        self.alert
    }

    /// Apply a freshly published baseline
    pub fn reset(&mut self, baseline: Duration) {
        self.remaining = baseline;
        self.alert = if baseline.is_zero() {
            AlertState::AlertOn
        } else {
            AlertState::Normal
        };
    }

    /// Count down by one unit, clamped at zero
    pub fn tick(&mut self, unit: Duration) -> TickOutcome {
        if self.remaining.is_zero() {
            return TickOutcome::Holding;
        }

        self.remaining = self.remaining.saturating_sub(unit);
        if self.remaining.is_zero() {
            self.alert = AlertState::AlertOn;
            TickOutcome::Expired
        } else {
            TickOutcome::Counting
        }
    }

    /// Jump straight to zero. Reports `Expired` only if time was remaining.
    pub fn expire(&mut self) -> TickOutcome {
        if self.remaining.is_zero() {
            return TickOutcome::Holding;
        }

        self.remaining = Duration::ZERO;
        self.alert = AlertState::AlertOn;
        TickOutcome::Expired
    }

    /// Flip the alert while expired; force `Normal` otherwise
    pub fn blink(&mut self) -> AlertState {
        self.alert = if self.remaining.is_zero() {
            match self.alert {
                AlertState::AlertOn => AlertState::AlertOff,
                AlertState::AlertOff | AlertState::Normal => AlertState::AlertOn,
            }
        } else {
            AlertState::Normal
        };
        self.alert
    }
}
