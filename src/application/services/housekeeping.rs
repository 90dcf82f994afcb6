use crate::domain::ports::process_manager::{ProcessManager, Signal};

/// Sends `signal` to the monitor that holds the instance lock.
///
/// `holder` is the pid recorded in the lock file. It is only signalled when it
/// is not us and is still a running process named `name`, so a recycled pid
/// or a short-lived `status`/`config` invocation is never touched. Returns true
/// when the signal was delivered. Best-effort only: the instance lock decides
/// who runs.
pub fn signal_lock_holder(
    manager: &dyn ProcessManager,
    name: &str,
    holder: u32,
    own_pid: u32,
    signal: Signal,
) -> bool {
    if holder == own_pid {
        return false;
    }
    if !manager.find_by_name(name).contains(&holder) {
        tracing::info!("Lock holder pid {holder} is not a running {name}, leaving it alone");
        return false;
    }
    match manager.signal(holder, signal) {
        Ok(()) => {
            tracing::info!("Sent {signal:?} to running {name} (pid {holder})");
            true
        }
        Err(e) => {
            tracing::warn!("Could not signal running {name} (pid {holder}): {e}");
            false
        }
    }
}
