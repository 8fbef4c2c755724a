use crate::types::constants::RECONNECT_INTERVAL_DIVISOR;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// Outcome of one health check run; decides the delay before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Keepalive sent (or attempted) on a live socket
    Alive,
    /// Network is down and a reconnect was issued
    Reconnecting,
    /// The owning client is gone; stop checking
    Detached,
}

/// Repeating liveness probe.
///
/// Unlike a fixed-period interval, every run computes its own successor's
/// delay: the full interval while healthy, a quarter of it while reconnecting.
/// At most one chain of runs exists; starting again replaces the old chain.
pub struct HealthChecker {
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl HealthChecker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: Mutex::new(None),
        }
    }

    /// Delay before the run that follows one ending in `probe`. `None` ends
    /// the chain.
    pub fn next_delay(interval: Duration, probe: Probe) -> Option<Duration> {
        match probe {
            Probe::Alive => Some(interval),
            Probe::Reconnecting => Some(interval / RECONNECT_INTERVAL_DIVISOR),
            Probe::Detached => None,
        }
    }

    /// Runs `probe` immediately, then again after each computed delay.
    ///
    /// Cancels any previously started chain first. The chain ends when the
    /// probe returns [`Probe::Detached`] or the checker is stopped.
    pub fn start<F>(&self, mut probe: F)
    where
        F: FnMut() -> Probe + Send + 'static,
    {
        let interval = self.interval;

        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.take() {
            tracing::debug!("Replacing running health checker");
            previous.abort();
        }

        *task = Some(tokio::spawn(async move {
            while let Some(delay) = Self::next_delay(interval, probe()) {
                tracing::debug!("Next health check in {:?}", delay);
                time::sleep(delay).await;
            }
            tracing::debug!("Health checker finished");
        }));
    }

    pub fn stop(&self) {
        if let Some(task) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
            tracing::info!("Health checker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for HealthChecker {
    fn drop(&mut self) {
        if let Some(task) = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}
