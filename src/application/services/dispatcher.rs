use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use super::config_store::ConfigStore;
use crate::domain::entities::alert::Alert;
use crate::domain::ports::presenter::AlertPresenter;

/// Minimum gap between an alert closing and the next one opening.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// What happened to a dispatch request. Only `Launched` reaches the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Launched,
    Disabled,
    CoolingDown,
    InFlight,
}

#[derive(Debug, Default)]
struct DispatchState {
    in_flight: bool,
    last_closed_at: Option<Instant>,
}

/// Clears the in-flight flag and stamps the close time when dropped, which
/// covers normal return, presenter errors and presenter panics alike.
struct InFlightGuard {
    state: Arc<Mutex<DispatchState>>,
    idle: Arc<Notify>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        {
            let mut state = lock(&self.state);
            state.in_flight = false;
            state.last_closed_at = Some(Instant::now());
        }
        self.idle.notify_waiters();
    }
}

fn lock(state: &Mutex<DispatchState>) -> MutexGuard<'_, DispatchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Rate-limited, single-flight, non-blocking alert delivery.
pub struct NotificationDispatcher {
    presenter: Arc<dyn AlertPresenter>,
    config: Arc<ConfigStore>,
    cooldown: Duration,
    state: Arc<Mutex<DispatchState>>,
    idle: Arc<Notify>,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(presenter: Arc<dyn AlertPresenter>, config: Arc<ConfigStore>) -> Self {
        Self {
            presenter,
            config,
            cooldown: DEFAULT_COOLDOWN,
            state: Arc::new(Mutex::new(DispatchState::default())),
            idle: Arc::new(Notify::new()),
        }
    }

    #[must_use]
    pub const fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        lock(&self.state).in_flight
    }

    /// Hands `alert` to the presenter on a detached blocking task and returns
    /// immediately. Requests arriving while disabled, during the cooldown or
    /// while another alert is open are dropped, never queued.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, alert: Alert) -> DispatchOutcome {
        if !self.config.get().notifications_enabled {
            tracing::debug!("Notifications disabled, dropping alert: {}", alert.title);
            return DispatchOutcome::Disabled;
        }

        let guard = {
            let mut state = lock(&self.state);
            if state
                .last_closed_at
                .is_some_and(|closed| closed.elapsed() < self.cooldown)
            {
                tracing::debug!("Alert cooldown active, dropping: {}", alert.title);
                return DispatchOutcome::CoolingDown;
            }
            if state.in_flight {
                tracing::debug!("Alert already open, dropping: {}", alert.title);
                return DispatchOutcome::InFlight;
            }
            state.in_flight = true;
            InFlightGuard {
                state: Arc::clone(&self.state),
                idle: Arc::clone(&self.idle),
            }
        };

        let presenter = Arc::clone(&self.presenter);
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            if let Err(e) = presenter.show_alert(&alert) {
                tracing::error!("Alert dispatch failed ({}): {e}", alert.severity);
            }
        });
        DispatchOutcome::Launched
    }

    /// Waits until no alert is open, up to `timeout`. Returns false on timeout.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.idle.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if !self.is_in_flight() {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}
