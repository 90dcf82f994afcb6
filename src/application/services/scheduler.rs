use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::monitor::MonitorService;

/// Wait before the next attempt after a failed sample, capped at the poll
/// interval.
pub const FAILURE_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Lifecycle of the poll loop. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    /// The loop did not reach `Stopped` in time; teardown should go ahead.
    TimedOut,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler can only be started once (state: {0:?})")]
    AlreadyStarted(LoopState),
}

/// Marks the loop `Stopped` however its task ends, panics included.
struct StoppedOnDrop(Arc<watch::Sender<LoopState>>);

impl Drop for StoppedOnDrop {
    fn drop(&mut self) {
        self.0.send_replace(LoopState::Stopped);
    }
}

/// Cooperative driver for [`MonitorService::tick`].
pub struct Scheduler {
    state: Arc<watch::Sender<LoopState>>,
    shutdown: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
    retry_delay: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(LoopState::Idle);
        let (shutdown, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
            shutdown,
            handle: Mutex::new(None),
            retry_delay: FAILURE_RETRY_DELAY,
        }
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        *self.state.borrow()
    }

    /// Spawns the poll loop on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::AlreadyStarted` unless the scheduler is `Idle`.
    pub fn start(&self, service: Arc<MonitorService>) -> Result<(), SchedulerError> {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.state();
        if current != LoopState::Idle {
            return Err(SchedulerError::AlreadyStarted(current));
        }
        self.state.send_replace(LoopState::Running);

        let stopped = StoppedOnDrop(Arc::clone(&self.state));
        let shutdown = self.shutdown.subscribe();
        let retry_delay = self.retry_delay;
        *handle = Some(tokio::spawn(async move {
            let _stopped = stopped;
            run_loop(&service, shutdown, retry_delay).await;
        }));
        Ok(())
    }

    /// Signals cancellation and waits up to `timeout` for the loop to finish.
    ///
    /// The wait is best-effort: an OS call already in progress is not
    /// interrupted, so a wedged tick yields `TimedOut` and the task is
    /// abandoned.
    pub async fn stop(&self, timeout: Duration) -> StopOutcome {
        let handle = {
            let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
            match self.state() {
                LoopState::Idle => {
                    self.state.send_replace(LoopState::Stopped);
                    return StopOutcome::Stopped;
                }
                LoopState::Running => {
                    self.state.send_replace(LoopState::Stopping);
                }
                LoopState::Stopping | LoopState::Stopped => {}
            }
            self.shutdown.send_replace(true);
            handle.take()
        };

        let mut state = self.state.subscribe();
        let finished = tokio::time::timeout(
            timeout,
            state.wait_for(|s| *s == LoopState::Stopped),
        )
        .await
        .is_ok();

        if finished {
            tracing::debug!("Monitor loop reached Stopped");
            StopOutcome::Stopped
        } else {
            tracing::warn!(
                "Monitor loop did not stop within {}ms, continuing shutdown",
                timeout.as_millis()
            );
            if let Some(handle) = handle {
                handle.abort();
            }
            StopOutcome::TimedOut
        }
    }
}

async fn run_loop(
    service: &MonitorService,
    mut shutdown: watch::Receiver<bool>,
    retry_delay: Duration,
) {
    tracing::info!("Monitor loop started");
    loop {
        if *shutdown.borrow() {
            break;
        }

        let interval = service.poll_interval();
        let delay = match service.tick().await {
            Ok(_) => interval,
            Err(e) => {
                tracing::warn!("Sampling failed, tick skipped: {e}");
                retry_delay.min(interval)
            }
        };

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    tracing::info!("Monitor loop stopped");
}
