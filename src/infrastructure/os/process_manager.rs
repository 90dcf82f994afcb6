use std::ffi::OsStr;

use nix::sys::signal::{self, Signal as NixSignal};
use nix::unistd::Pid;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use crate::domain::ports::process_manager::{ProcessError, ProcessManager, Signal};

/// Process lookup via `sysinfo`, signalling via POSIX `kill`.
pub struct OsProcessManager;

impl OsProcessManager {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for OsProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

const fn to_nix_signal(sig: Signal) -> NixSignal {
    match sig {
        Signal::Terminate => NixSignal::SIGTERM,
        Signal::Kill => NixSignal::SIGKILL,
    }
}

impl ProcessManager for OsProcessManager {
    fn find_by_name(&self, name: &str) -> Vec<u32> {
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        let mut pids: Vec<u32> = sys
            .processes_by_exact_name(OsStr::new(name))
            .filter(|p| p.thread_kind().is_none())
            .map(|p| p.pid().as_u32())
            .collect();
        pids.sort_unstable();
        pids
    }

    fn signal(&self, pid: u32, signal: Signal) -> Result<(), ProcessError> {
        // PID 0 addresses the whole process group.
        if pid == 0 {
            return Err(ProcessError::SignalFailed(
                "cannot signal PID 0 (process group)".into(),
            ));
        }
        let nix_pid = Pid::from_raw(
            i32::try_from(pid)
                .map_err(|_| ProcessError::SignalFailed(format!("invalid pid: {pid}")))?,
        );

        signal::kill(nix_pid, to_nix_signal(signal)).map_err(|errno| match errno {
            nix::errno::Errno::ESRCH => ProcessError::NotFound(pid),
            nix::errno::Errno::EPERM => ProcessError::PermissionDenied(pid),
            other => ProcessError::SignalFailed(other.to_string()),
        })
    }
}
