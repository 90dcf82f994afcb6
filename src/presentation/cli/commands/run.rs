use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal::unix::{signal, SignalKind};

use crate::application::services::config_store::ConfigStore;
use crate::application::services::housekeeping::signal_lock_holder;
use crate::application::services::monitor::MonitorService;
use crate::application::services::scheduler::{Scheduler, StopOutcome};
use crate::domain::ports::process_manager::{ProcessManager, Signal};
use crate::domain::value_objects::settings::MonitorSettings;
use crate::infrastructure::os::instance_lock::InstanceLock;

/// How long `stop` may wait for the loop before teardown continues.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);
/// How long `--replace` waits for the holder to let go after each signal.
pub const REPLACE_GRACE: Duration = Duration::from_secs(3);
const REPLACE_POLL: Duration = Duration::from_millis(100);

/// Takes the instance lock, optionally evicting the monitor that holds it.
///
/// With `replace`, the pid recorded in the lock file gets SIGTERM; if the lock
/// is still held after `grace`, it gets SIGKILL and another `grace` to let go.
/// Returns `Ok(false)` when another monitor keeps the lock.
///
/// # Errors
///
/// Returns an error if the lock file cannot be opened or locked.
pub async fn acquire_instance(
    lock: &InstanceLock,
    replace: bool,
    processes: &dyn ProcessManager,
    grace: Duration,
) -> anyhow::Result<bool> {
    if lock.acquire().context("Failed to take the instance lock")? {
        return Ok(true);
    }
    if !replace {
        return Ok(false);
    }
    let Some(holder) = lock.holder_pid() else {
        tracing::warn!("No pid recorded in {}, cannot replace", lock.path().display());
        return Ok(false);
    };

    let name = executable_name();
    let own_pid = std::process::id();
    for sig in [Signal::Terminate, Signal::Kill] {
        if !signal_lock_holder(processes, &name, holder, own_pid, sig) {
            return Ok(false);
        }
        if wait_for_lock(lock, grace).await? {
            return Ok(true);
        }
        tracing::warn!("pid {holder} still holds the lock after {}ms", grace.as_millis());
    }
    Ok(false)
}

async fn wait_for_lock(lock: &InstanceLock, grace: Duration) -> anyhow::Result<bool> {
    let deadline = tokio::time::Instant::now() + grace;
    while tokio::time::Instant::now() < deadline {
        tokio::time::sleep(REPLACE_POLL).await;
        if lock.acquire().context("Failed to take the instance lock")? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// One-line summary of the effective settings for the startup log entry.
#[must_use]
pub fn startup_summary(settings: &MonitorSettings) -> String {
    format!(
        "thresholds {}, interval {}s, notifications {}",
        settings.thresholds,
        settings.poll_interval_secs(),
        if settings.notifications_enabled { "on" } else { "off" }
    )
}

fn executable_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "ramwatch".to_string())
}

/// Run the monitor loop until Ctrl-C or SIGTERM.
///
/// Exits cleanly with `Ok(())` if another instance already holds the lock.
/// SIGHUP reloads the settings file.
///
/// # Errors
///
/// Returns an error on unrecoverable startup failures: the lock file cannot
/// be created, signal handlers cannot be installed, or the loop cannot start.
pub async fn run_monitor(
    service: Arc<MonitorService>,
    lock: &InstanceLock,
    replace: bool,
    processes: &dyn ProcessManager,
) -> anyhow::Result<()> {
    if !acquire_instance(lock, replace, processes, REPLACE_GRACE).await? {
        tracing::info!(
            "Another ramwatch instance holds {}, exiting",
            lock.path().display()
        );
        return Ok(());
    }

    tracing::info!(
        "ramwatch started ({})",
        startup_summary(&service.config().get())
    );

    let scheduler = Scheduler::new();
    let result = async {
        scheduler
            .start(Arc::clone(&service))
            .context("Failed to start monitor loop")?;
        wait_for_shutdown(service.config()).await
    }
    .await;

    if scheduler.stop(STOP_TIMEOUT).await == StopOutcome::TimedOut {
        tracing::warn!("Monitor loop abandoned after {}s", STOP_TIMEOUT.as_secs());
    }
    lock.release();
    tracing::info!("ramwatch stopped");
    result
}

async fn wait_for_shutdown(config: &ConfigStore) -> anyhow::Result<()> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.context("Failed to listen for Ctrl-C")?;
                tracing::info!("Interrupt received, shutting down");
                return Ok(());
            }
            _ = sigterm.recv() => {
                tracing::info!("SIGTERM received, shutting down");
                return Ok(());
            }
            _ = sighup.recv() => {
                tracing::info!("SIGHUP received, reloading settings");
                config.reload();
            }
        }
    }
}
