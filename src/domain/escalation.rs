//! Threshold-crossing state machine.
//!
//! Turns a stream of classified samples into at most one alert per tier per
//! excursion. Firing history survives across ticks and is only cleared when
//! usage returns to [`Severity::Normal`] or when the thresholds themselves
//! change.

use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::Thresholds;

/// Which tiers already raised an alert during the current excursion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub medium_fired: bool,
    pub critical_fired: bool,
}

impl NotificationState {
    pub const ARMED: Self = Self {
        medium_fired: false,
        critical_fired: false,
    };
}

/// Outcome of one tick of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub severity: Severity,
    /// Tier to alert for, if this tick crossed into a tier not yet alerted.
    pub fire: Option<Severity>,
    /// Thresholds the sample was classified against.
    pub thresholds: Thresholds,
    /// True when a threshold edit re-armed both tiers on this tick.
    pub thresholds_changed: bool,
}

/// Pure transition: given the tier of the current sample and the firing
/// history, returns the tier to alert for and the next history.
#[must_use]
pub const fn transition(
    severity: Severity,
    state: NotificationState,
) -> (Option<Severity>, NotificationState) {
    match severity {
        Severity::Critical if !state.critical_fired => (
            Some(Severity::Critical),
            NotificationState {
                medium_fired: true,
                critical_fired: true,
            },
        ),
        Severity::Medium if !state.medium_fired => (
            Some(Severity::Medium),
            NotificationState {
                medium_fired: true,
                critical_fired: state.critical_fired,
            },
        ),
        Severity::Normal => (None, NotificationState::ARMED),
        Severity::Medium | Severity::Critical => (None, state),
    }
}

/// Firing history plus the shadow copy of the thresholds it was built under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationTracker {
    state: NotificationState,
    previous: Thresholds,
}

impl EscalationTracker {
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self {
            state: NotificationState::ARMED,
            previous: thresholds,
        }
    }

    #[must_use]
    pub const fn state(&self) -> NotificationState {
        self.state
    }

    #[must_use]
    pub const fn previous_thresholds(&self) -> Thresholds {
        self.previous
    }

    /// Records `thresholds` as current. Returns true (and re-arms both tiers)
    /// when they differ from the previous pair.
    pub fn sync_thresholds(&mut self, thresholds: Thresholds) -> bool {
        if thresholds == self.previous {
            return false;
        }
        self.previous = thresholds;
        self.state = NotificationState::ARMED;
        true
    }

    /// Runs one tick for `used_percent` under `thresholds`.
    pub fn observe(&mut self, used_percent: f64, thresholds: Thresholds) -> Evaluation {
        let severity = thresholds.classify(used_percent);
        let thresholds_changed = self.sync_thresholds(thresholds);
        let (fire, next) = transition(severity, self.state);
        self.state = next;
        Evaluation {
            severity,
            fire,
            thresholds,
            thresholds_changed,
        }
    }
}
