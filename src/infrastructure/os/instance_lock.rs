use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use thiserror::Error;

const LOCK_FILE_NAME: &str = "ramwatch.lock";

#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("cannot open lock file {path}: {source}")]
    LockFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: Errno,
    },
}

/// Machine-wide single-instance guard backed by an exclusive `flock`.
///
/// The kernel drops the lock when the holding process dies, so a crashed
/// monitor never leaves a stale lock behind. The file itself is left in place.
pub struct InstanceLock {
    path: PathBuf,
    held: Mutex<Option<Flock<File>>>,
}

impl InstanceLock {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            held: Mutex::new(None),
        }
    }

    /// `$XDG_RUNTIME_DIR/ramwatch.lock`, or the temp dir when unset.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(LOCK_FILE_NAME)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Tries to take the lock without blocking.
    ///
    /// Returns `Ok(false)` when another live instance holds it. Calling it
    /// again while this instance already holds the lock returns `Ok(true)`.
    ///
    /// # Errors
    ///
    /// Returns `InstanceError` if the lock file cannot be opened or `flock`
    /// fails for a reason other than contention.
    pub fn acquire(&self) -> Result<bool, InstanceError> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if held.is_some() {
            return Ok(true);
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| InstanceError::LockFile {
                path: self.path.clone(),
                source,
            })?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => {
                if let Err(e) = write_pid(&lock) {
                    tracing::debug!("Could not record pid in {}: {e}", self.path.display());
                }
                tracing::debug!("Instance lock acquired: {}", self.path.display());
                *held = Some(lock);
                Ok(true)
            }
            Err((_, errno)) if errno == Errno::EWOULDBLOCK => Ok(false),
            Err((_, source)) => Err(InstanceError::Lock {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Pid recorded in the lock file by whichever instance took the lock.
    /// `None` if the file is missing or does not hold a pid.
    #[must_use]
    pub fn holder_pid(&self) -> Option<u32> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| content.trim().parse().ok())
    }

    /// Drops the lock if held. Safe to call more than once.
    pub fn release(&self) {
        let lock = self
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(lock) = lock {
            match lock.unlock() {
                Ok(_) => tracing::debug!("Instance lock released: {}", self.path.display()),
                Err((_, e)) => tracing::warn!("Failed to unlock {}: {e}", self.path.display()),
            }
        }
    }
}

fn write_pid(mut file: &File) -> std::io::Result<()> {
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())
}
