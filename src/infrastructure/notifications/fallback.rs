use crate::domain::entities::alert::Alert;
use crate::domain::ports::presenter::{AlertPresenter, PresentationError};

/// Tries `primary`; when its channel is unavailable, delivers via `fallback`.
///
/// Other failures from `primary` (the alert was reachable but could not be
/// drawn) are returned as-is so the dispatcher logs them.
pub struct FallbackPresenter {
    primary: Box<dyn AlertPresenter>,
    fallback: Box<dyn AlertPresenter>,
}

impl FallbackPresenter {
    #[must_use]
    pub fn new(primary: Box<dyn AlertPresenter>, fallback: Box<dyn AlertPresenter>) -> Self {
        Self { primary, fallback }
    }
}

impl AlertPresenter for FallbackPresenter {
    fn show_alert(&self, alert: &Alert) -> Result<(), PresentationError> {
        match self.primary.show_alert(alert) {
            Err(PresentationError::ChannelUnavailable(reason)) => {
                tracing::warn!("Primary alert channel unavailable ({reason}), using fallback");
                self.fallback.show_alert(alert)
            }
            other => other,
        }
    }
}
