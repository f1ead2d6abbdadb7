//! Restart scheduler background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    time::{sleep, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    services::{perform_restart, ServiceControl},
    state::{AppState, ManualRestart},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Scheduled,
    Manual,
}

/// Background task that restarts the service every interval, or on demand.
///
/// Runs until shutdown is requested. A cycle that has started always runs to
/// completion; the stop request is honoured right after it.
pub async fn scheduler_task(
    state: Arc<AppState>,
    control: Arc<dyn ServiceControl>,
    mut restart_rx: mpsc::Receiver<ManualRestart>,
) {
    let policy = state.policy().clone();
    let interval = policy.interval();
    let shutdown = state.shutdown().clone();

    info!(
        "Starting restart scheduler for {} every {:?}",
        policy.service_name(),
        interval
    );

    let deadline = sleep(interval);
    tokio::pin!(deadline);
    rearm(&state, interval);

    loop {
        let trigger = tokio::select! {
            biased;

            _ = shutdown.wait() => break,

            request = restart_rx.recv() => match request {
                Some(ManualRestart) => Trigger::Manual,
                None => break,
            },

            _ = &mut deadline => Trigger::Scheduled,
        };

        // A manual trigger already holds the in-flight slot.
        let claimed = state.try_begin_cycle();
        match trigger {
            Trigger::Manual => info!("Manual restart triggered"),
            Trigger::Scheduled if claimed => info!("Restart interval elapsed"),
            Trigger::Scheduled => {
                info!("Restart interval elapsed, this cycle also serves the pending manual request")
            }
        }
        if trigger == Trigger::Scheduled {
            // Show 00:00 and the alert for the duration of the cycle.
            state.mark_expired();
        }

        let outcome = perform_restart(policy.service_name(), policy.hold_time(), control.as_ref()).await;
        if !outcome.is_success() {
            warn!("Restart cycle failed, next attempt in {:?}", interval);
        }
        state.record_outcome(outcome);

        // Both triggers restart the cadence from now.
        deadline.as_mut().reset(Instant::now() + interval);
        rearm(&state, interval);

        // Requests that slipped in during the cycle are dropped, not queued.
        while restart_rx.try_recv().is_ok() {
            debug!("Discarding manual restart requested during the cycle");
        }
        state.end_cycle();
    }

    restart_rx.close();
    info!("Stopping restart loop");
}

/// Publish the full interval as the new countdown baseline
fn rearm(state: &AppState, interval: Duration) {
    state.publish_baseline(interval);
    match chrono::Duration::from_std(interval) {
        Ok(delta) => state.set_next_restart_at(chrono::Utc::now() + delta),
        Err(e) => debug!("Next restart time not representable: {}", e),
    }
}
