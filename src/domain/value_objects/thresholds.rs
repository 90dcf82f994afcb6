use serde::Serialize;

use super::severity::Severity;

/// Pair of RAM usage thresholds, in whole percent.
///
/// Always satisfies `10 <= medium < critical <= 100`; the only way to build
/// one from untrusted numbers is [`Thresholds::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Thresholds {
    medium: u8,
    critical: u8,
}

impl Thresholds {
    pub const MEDIUM_MIN: u8 = 10;
    pub const MEDIUM_MAX: u8 = 95;
    pub const CRITICAL_MAX: u8 = 100;

    /// Clamps `medium` into `10..=95`, then `critical` into `medium+1..=100`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(medium: i64, critical: i64) -> Self {
        let medium = medium.clamp(i64::from(Self::MEDIUM_MIN), i64::from(Self::MEDIUM_MAX));
        let critical = critical.clamp(medium + 1, i64::from(Self::CRITICAL_MAX));
        Self {
            medium: medium as u8,
            critical: critical as u8,
        }
    }

    #[must_use]
    pub const fn medium(&self) -> u8 {
        self.medium
    }

    #[must_use]
    pub const fn critical(&self) -> u8 {
        self.critical
    }

    /// Tier for a usage percentage. Both bounds are inclusive (`>=`).
    #[must_use]
    pub fn classify(&self, used_percent: f64) -> Severity {
        if used_percent >= f64::from(self.critical) {
            Severity::Critical
        } else if used_percent >= f64::from(self.medium) {
            Severity::Medium
        } else {
            Severity::Normal
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            medium: 80,
            critical: 90,
        }
    }
}

impl std::fmt::Display for Thresholds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%/{}%", self.medium, self.critical)
    }
}
