use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BYTES_PER_GIB: f64 = 1_073_741_824.0;

/// One memory reading, produced fresh each tick and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    pub used_percent: f64,
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub taken_at: DateTime<Utc>,
}

impl MemorySample {
    /// Builds a sample from raw byte counts, timestamped now.
    ///
    /// `used_percent` is `used / total * 100`, or `0.0` when `total` is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_bytes(used_bytes: u64, total_bytes: u64, available_bytes: u64) -> Self {
        let used_percent = if total_bytes > 0 {
            (used_bytes as f64 / total_bytes as f64) * 100.0
        } else {
            0.0
        };
        Self {
            used_percent,
            used_bytes,
            total_bytes,
            available_bytes,
            taken_at: Utc::now(),
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn used_gib(&self) -> f64 {
        self.used_bytes as f64 / BYTES_PER_GIB
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_gib(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_GIB
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn available_gib(&self) -> f64 {
        self.available_bytes as f64 / BYTES_PER_GIB
    }
}
