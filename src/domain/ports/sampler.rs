use thiserror::Error;

use crate::domain::entities::sample::MemorySample;

#[derive(Error, Debug)]
pub enum SamplingError {
    #[error("memory statistics unavailable: {0}")]
    Unavailable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("timeout while sampling memory")]
    Timeout,
}

pub trait MemorySampler: Send + Sync {
    /// Take one memory reading.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError` if the OS counters cannot be read.
    fn sample(&self) -> Result<MemorySample, SamplingError>;
}
