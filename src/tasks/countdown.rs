//! Countdown presenter background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    display::{format_remaining, DisplaySink},
    state::{AlertState, Baseline, CountdownState, TickOutcome},
    utils::Shutdown,
};

/// One countdown unit
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Alert flash period; must stay shorter than [`TICK_PERIOD`]
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Background task that counts down to the next restart and drives the
/// alert indicator.
///
/// This task is the only owner of the [`CountdownState`]: the countdown tick,
/// the blink tick and baseline resets are handled by one `select!`, with
/// resets taking priority over pending ticks. A scheduled expiry is shown even
/// when the following reset arrives in the same channel update.
pub async fn countdown_task(
    service_name: String,
    mut baseline_rx: watch::Receiver<Baseline>,
    display: Arc<dyn DisplaySink>,
    shutdown: Shutdown,
) {
    info!("Starting countdown presenter");

    let notice = format!("Restarting {}...", service_name);
    let initial = *baseline_rx.borrow_and_update();
    let mut seen_expirations = initial.expirations;
    let mut countdown = CountdownState::new(initial.remaining);
    show_reset(&countdown, display.as_ref());

    let now = Instant::now();
    let mut tick = interval_at(now + TICK_PERIOD, TICK_PERIOD);
    let mut blink = interval_at(now + BLINK_PERIOD, BLINK_PERIOD);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    blink.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = shutdown.wait() => break,

            changed = baseline_rx.changed() => {
                if changed.is_err() {
                    debug!("Baseline channel closed");
                    break;
                }
                let baseline = *baseline_rx.borrow_and_update();
                if baseline.expirations != seen_expirations {
                    seen_expirations = baseline.expirations;
                    // No-op if the local tick already reached zero.
                    if countdown.expire() == TickOutcome::Expired {
                        info!("Restart deadline reached, restart in progress");
                        blink.reset();
                        show_expired(&countdown, display.as_ref(), &notice);
                    }
                }
                if !baseline.remaining.is_zero() {
                    debug!("Countdown reset to {:?}", baseline.remaining);
                    countdown.reset(baseline.remaining);
                    tick.reset();
                    show_reset(&countdown, display.as_ref());
                }
            }

            _ = tick.tick() => {
                if countdown.tick(TICK_PERIOD) == TickOutcome::Expired {
                    info!("Countdown expired, restart in progress");
                    // Hold AlertOn for a full blink period before the first flip.
                    blink.reset();
                    show_expired(&countdown, display.as_ref(), &notice);
                } else {
                    display.set_timer_text(&format_remaining(countdown.remaining()));
                }
            }

            _ = blink.tick() => {
                let alert = countdown.blink();
                display.set_alert(alert);
                if alert == AlertState::Normal {
                    display.set_status_message(None);
                }
            }
        }
    }

    info!("Stopping countdown presenter");
}

fn show_expired(countdown: &CountdownState, display: &dyn DisplaySink, notice: &str) {
    display.set_timer_text(&format_remaining(countdown.remaining()));
    display.set_alert(AlertState::AlertOn);
    display.set_status_message(Some(notice));
}

fn show_reset(countdown: &CountdownState, display: &dyn DisplaySink) {
    display.set_timer_text(&format_remaining(countdown.remaining()));
    display.set_alert(countdown.alert());
    if countdown.alert() == AlertState::Normal {
        display.set_status_message(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::mock::{Call, MockControl},
        state::{AppState, RestartPolicy},
        tasks::scheduler_task,
    };
    use std::sync::Mutex;
    use tokio::{task::JoinHandle, time::sleep};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Update {
        Text(String),
        Alert(AlertState),
        Status(Option<String>),
    }

    #[derive(Debug, Default)]
    struct RecordingDisplay {
        updates: Mutex<Vec<Update>>,
    }

    impl RecordingDisplay {
        fn updates(&self) -> Vec<Update> {
            self.updates.lock().unwrap().clone()
        }

        fn last_text(&self) -> Option<String> {
            self.updates().into_iter().rev().find_map(|u| match u {
                Update::Text(text) => Some(text),
                _ => None,
            })
        }

        fn last_alert(&self) -> Option<AlertState> {
            self.updates().into_iter().rev().find_map(|u| match u {
                Update::Alert(alert) => Some(alert),
                _ => None,
            })
        }

        fn texts(&self) -> Vec<String> {
            self.updates()
                .into_iter()
                .filter_map(|u| match u {
                    Update::Text(text) => Some(text),
                    _ => None,
                })
                .collect()
        }

        fn alerts(&self) -> Vec<AlertState> {
            self.updates()
                .into_iter()
                .filter_map(|u| match u {
                    Update::Alert(alert) => Some(alert),
                    _ => None,
                })
                .collect()
        }

        fn notices(&self) -> usize {
            self.updates()
                .iter()
                .filter(|u| matches!(u, Update::Status(Some(_))))
                .count()
        }
    }

    impl DisplaySink for RecordingDisplay {
        fn set_timer_text(&self, text: &str) {
            self.updates.lock().unwrap().push(Update::Text(text.to_string()));
        }

        fn set_alert(&self, alert: AlertState) {
            self.updates.lock().unwrap().push(Update::Alert(alert));
        }

        fn set_status_message(&self, message: Option<&str>) {
            self.updates
                .lock()
                .unwrap()
                .push(Update::Status(message.map(str::to_string)));
        }
    }

    fn spawn_presenter(
        baseline: Duration,
    ) -> (watch::Sender<Baseline>, Arc<RecordingDisplay>, Shutdown, JoinHandle<()>) {
        let (baseline_tx, baseline_rx) = watch::channel(Baseline::new(baseline));
        let display = Arc::new(RecordingDisplay::default());
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(countdown_task(
            "spooler".to_string(),
            baseline_rx,
            display.clone(),
            shutdown.clone(),
        ));
        (baseline_tx, display, shutdown, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_once_per_second() {
        let (_baseline_tx, display, shutdown, handle) = spawn_presenter(Duration::from_secs(3));

        sleep(Duration::from_millis(250)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:03"));
        assert_eq!(display.last_alert(), Some(AlertState::Normal));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:02"));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:01"));
        assert_eq!(display.last_alert(), Some(AlertState::Normal));
        assert_eq!(display.notices(), 0);

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_raises_one_notice_and_flashes() {
        let (_baseline_tx, display, shutdown, handle) = spawn_presenter(Duration::from_secs(1));

        sleep(Duration::from_millis(1_250)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:00"));
        assert_eq!(display.last_alert(), Some(AlertState::AlertOn));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(display.last_alert(), Some(AlertState::AlertOff));
        sleep(Duration::from_millis(500)).await;
        assert_eq!(display.last_alert(), Some(AlertState::AlertOn));

        // Several more ticks at zero do not repeat the notice.
        sleep(Duration::from_secs(5)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:00"));
        assert_eq!(display.notices(), 1);

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn new_baseline_clears_alert_immediately() {
        let (baseline_tx, display, shutdown, handle) = spawn_presenter(Duration::from_secs(1));

        sleep(Duration::from_millis(1_750)).await;
        assert!(display.last_alert().unwrap().is_alerting());

        baseline_tx.send(Baseline::new(Duration::from_secs(90))).unwrap();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(display.last_text().as_deref(), Some("01:30"));
        assert_eq!(display.last_alert(), Some(AlertState::Normal));
        assert_eq!(display.updates().last(), Some(&Update::Status(None)));

        // A full unit passes before the next decrement.
        sleep(Duration::from_millis(900)).await;
        assert_eq!(display.last_text().as_deref(), Some("01:30"));
        sleep(Duration::from_millis(200)).await;
        assert_eq!(display.last_text().as_deref(), Some("01:29"));

        // The next expiry raises a fresh notice.
        baseline_tx.send(Baseline::new(Duration::from_secs(1))).unwrap();
        sleep(Duration::from_millis(1_250)).await;
        assert_eq!(display.notices(), 2);

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_expiry_flashes_until_the_cycle_ends() {
        let (baseline_tx, display, shutdown, handle) = spawn_presenter(Duration::from_secs(60));

        sleep(Duration::from_millis(250)).await;
        baseline_tx.send_modify(|baseline| {
            baseline.remaining = Duration::ZERO;
            baseline.expirations += 1;
        });
        sleep(Duration::from_millis(10)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:00"));
        assert_eq!(display.last_alert(), Some(AlertState::AlertOn));
        assert_eq!(display.notices(), 1);

        sleep(Duration::from_millis(500)).await;
        assert_eq!(display.last_alert(), Some(AlertState::AlertOff));

        baseline_tx.send_modify(|baseline| baseline.remaining = Duration::from_secs(60));
        sleep(Duration::from_millis(10)).await;
        assert_eq!(display.last_text().as_deref(), Some("01:00"));
        assert_eq!(display.last_alert(), Some(AlertState::Normal));
        assert_eq!(display.notices(), 1);

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_is_shown_when_the_reset_arrives_with_it() {
        let (baseline_tx, display, shutdown, handle) = spawn_presenter(Duration::from_secs(60));

        sleep(Duration::from_millis(250)).await;
        // Both updates land before the presenter wakes up.
        baseline_tx.send_modify(|baseline| {
            baseline.remaining = Duration::ZERO;
            baseline.expirations += 1;
        });
        baseline_tx.send_modify(|baseline| baseline.remaining = Duration::from_secs(60));
        sleep(Duration::from_millis(10)).await;

        assert!(display.texts().iter().any(|text| text == "00:00"));
        assert!(display.alerts().contains(&AlertState::AlertOn));
        assert_eq!(display.notices(), 1);
        assert_eq!(display.last_text().as_deref(), Some("01:00"));
        assert_eq!(display.last_alert(), Some(AlertState::Normal));
        assert_eq!(display.updates().last(), Some(&Update::Status(None)));

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn exits_within_one_tick_of_stop() {
        let (_baseline_tx, _display, shutdown, handle) = spawn_presenter(Duration::from_secs(60));

        sleep(Duration::from_millis(300)).await;
        shutdown.trigger();
        tokio::time::timeout(TICK_PERIOD, handle)
            .await
            .expect("presenter did not stop")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_and_presenter_stay_in_step() {
        let policy = RestartPolicy::new("spooler", Duration::from_secs(2), Duration::ZERO).unwrap();
        let (state, restart_rx) = AppState::new(policy, "127.0.0.1".to_string(), 0);
        let state = Arc::new(state);
        let control = Arc::new(MockControl::new());

        let scheduler = tokio::spawn(scheduler_task(
            Arc::clone(&state),
            control.clone(),
            restart_rx,
        ));
        let display = Arc::new(RecordingDisplay::default());
        let presenter = tokio::spawn(countdown_task(
            "spooler".to_string(),
            state.subscribe_baseline(),
            display.clone(),
            state.shutdown().clone(),
        ));

        sleep(Duration::from_millis(250)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:02"));
        assert_eq!(display.last_alert(), Some(AlertState::Normal));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:01"));
        assert!(control.calls().is_empty());
        assert!(!display.texts().iter().any(|text| text == "00:00"));

        // t=2: zero is shown with the alert and one notice, then the
        // countdown is back at the full interval.
        sleep(Duration::from_secs(1)).await;
        assert_eq!(control.calls(), vec![Call::Stop, Call::Start]);
        assert!(display.texts().iter().any(|text| text == "00:00"));
        assert!(display.alerts().contains(&AlertState::AlertOn));
        assert_eq!(display.notices(), 1);
        assert_eq!(display.last_text().as_deref(), Some("00:02"));
        assert_eq!(display.last_alert(), Some(AlertState::Normal));
        assert_eq!(display.updates().last(), Some(&Update::Status(None)));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(display.last_text().as_deref(), Some("00:01"));
        assert_eq!(display.notices(), 1);

        assert!(state.request_stop());
        scheduler.await.unwrap();
        presenter.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_cycle_still_resets_the_countdown() {
        let policy = RestartPolicy::new("spooler", Duration::from_secs(2), Duration::ZERO).unwrap();
        let (state, restart_rx) = AppState::new(policy, "127.0.0.1".to_string(), 0);
        let state = Arc::new(state);
        let control = Arc::new(MockControl::new().failing_stop("access denied"));

        let scheduler = tokio::spawn(scheduler_task(
            Arc::clone(&state),
            control.clone(),
            restart_rx,
        ));
        let presenter = tokio::spawn(countdown_task(
            "spooler".to_string(),
            state.subscribe_baseline(),
            Arc::new(state.display().clone()),
            state.shutdown().clone(),
        ));

        sleep(Duration::from_millis(2_250)).await;
        assert_eq!(control.calls(), vec![Call::Stop]);
        let snapshot = state.display_snapshot();
        assert_eq!(snapshot.timer_text, "00:02");
        assert_eq!(snapshot.alert, AlertState::Normal);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(control.calls(), vec![Call::Stop, Call::Stop]);

        state.request_stop();
        scheduler.await.unwrap();
        presenter.await.unwrap();
    }
}
