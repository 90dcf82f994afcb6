use std::time::Duration;

use serde::Serialize;

use super::thresholds::Thresholds;

/// Validated monitor settings shared by the poll loop and the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonitorSettings {
    pub thresholds: Thresholds,
    poll_interval_secs: u64,
    pub notifications_enabled: bool,
}

impl MonitorSettings {
    pub const INTERVAL_MIN_SECS: u64 = 1;
    pub const INTERVAL_MAX_SECS: u64 = 30;

    /// Builds settings from raw values, clamping every field into range.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn clamped(
        medium: i64,
        critical: i64,
        interval_secs: i64,
        notifications_enabled: bool,
    ) -> Self {
        let interval = interval_secs.clamp(
            Self::INTERVAL_MIN_SECS as i64,
            Self::INTERVAL_MAX_SECS as i64,
        );
        Self {
            thresholds: Thresholds::clamped(medium, critical),
            poll_interval_secs: interval as u64,
            notifications_enabled,
        }
    }

    #[must_use]
    pub const fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Copy with a new interval, clamped into `1..=30` seconds.
    #[must_use]
    pub fn with_interval_secs(self, secs: u64) -> Self {
        Self {
            poll_interval_secs: secs.clamp(Self::INTERVAL_MIN_SECS, Self::INTERVAL_MAX_SECS),
            ..self
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            poll_interval_secs: 5,
            notifications_enabled: true,
        }
    }
}
