//! Instrumented service control for tests

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::time::sleep;

use super::ServiceControl;
use crate::error::ControlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Stop,
    Start,
}

/// Records calls and tracks how many run at once
#[derive(Debug, Default)]
pub struct MockControl {
    calls: Mutex<Vec<Call>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    op_delay: Duration,
    stop_error: Option<String>,
    start_error: Option<String>,
}

impl MockControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make each call take `delay` to complete
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.op_delay = delay;
        self
    }

    pub fn failing_stop(mut self, detail: &str) -> Self {
        self.stop_error = Some(detail.to_string());
        self
    }

    pub fn failing_start(mut self, detail: &str) -> Self {
        self.start_error = Some(detail.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    async fn invoke(&self, call: Call, error: &Option<String>) -> Result<(), ControlError> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        self.calls.lock().unwrap().push(call);

        if !self.op_delay.is_zero() {
            sleep(self.op_delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        match error {
            Some(detail) => Err(ControlError::Other(detail.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ServiceControl for MockControl {
    async fn stop(&self, _service_name: &str) -> Result<(), ControlError> {
        self.invoke(Call::Stop, &self.stop_error).await
    }

    async fn start(&self, _service_name: &str) -> Result<(), ControlError> {
        self.invoke(Call::Start, &self.start_error).await
    }
}
