use serde::{Deserialize, Serialize};

/// Memory pressure tier, totally ordered `Normal < Medium < Critical`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Normal,
    Medium,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl Severity {
    #[must_use]
    pub const fn emoji(&self) -> &str {
        match self {
            Self::Normal => "\u{1f7e2}",
            Self::Medium => "\u{26a0}\u{fe0f}",
            Self::Critical => "\u{1f534}",
        }
    }

    #[must_use]
    pub const fn color(&self) -> &str {
        match self {
            Self::Normal => "green",
            Self::Medium => "yellow",
            Self::Critical => "bright red",
        }
    }

    /// Short alert title used by every presenter.
    #[must_use]
    pub const fn alert_title(&self) -> &str {
        match self {
            Self::Normal => "Memory usage back to normal",
            Self::Medium => "High memory usage",
            Self::Critical => "Critical memory usage",
        }
    }
}
