use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Terminate,
    Kill,
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("process not found: pid {0}")]
    NotFound(u32),
    #[error("permission denied to manage process: pid {0}")]
    PermissionDenied(u32),
    #[error("failed to send signal: {0}")]
    SignalFailed(String),
}

pub trait ProcessManager: Send + Sync {
    /// PIDs of running processes whose executable name is `name`.
    fn find_by_name(&self, name: &str) -> Vec<u32>;

    /// Send a specific signal to a process.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError` if the process is not found,
    /// permission is denied, or the signal fails.
    fn signal(&self, pid: u32, signal: Signal) -> Result<(), ProcessError>;
}
