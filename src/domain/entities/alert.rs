use chrono::{DateTime, Utc};
use serde::Serialize;

use super::sample::MemorySample;
use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::Thresholds;

/// An alert request handed to the notification dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl Alert {
    /// Alert describing `sample` after it crossed into `severity`.
    #[must_use]
    pub fn for_sample(severity: Severity, sample: &MemorySample, thresholds: Thresholds) -> Self {
        let limit = match severity {
            Severity::Critical => thresholds.critical(),
            Severity::Medium | Severity::Normal => thresholds.medium(),
        };
        Self {
            timestamp: sample.taken_at,
            severity,
            title: severity.alert_title().to_string(),
            body: format!(
                "RAM usage: {:.1}% (threshold {limit}%)\nUsed: {:.2} GiB of {:.2} GiB\nAvailable: {:.2} GiB",
                sample.used_percent,
                sample.used_gib(),
                sample.total_gib(),
                sample.available_gib(),
            ),
        }
    }
}
