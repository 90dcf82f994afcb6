use std::sync::Mutex;

use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use crate::domain::entities::sample::MemorySample;
use crate::domain::ports::sampler::{MemorySampler, SamplingError};

/// Reads RAM counters through `sysinfo`.
///
/// `System` needs `&mut self` to refresh, hence the mutex.
pub struct SysinfoSampler {
    sys: Mutex<System>,
}

impl SysinfoSampler {
    #[must_use]
    pub fn new() -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        Self {
            sys: Mutex::new(sys),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySampler for SysinfoSampler {
    fn sample(&self) -> Result<MemorySample, SamplingError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| SamplingError::Unavailable(format!("system lock poisoned: {e}")))?;
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());

        let total = sys.total_memory();
        let used = sys.used_memory();
        let available = sys.available_memory();
        drop(sys);

        if total == 0 {
            return Err(SamplingError::Unavailable(
                "total memory reported as 0".to_string(),
            ));
        }
        Ok(MemorySample::from_bytes(used, total, available))
    }
}
