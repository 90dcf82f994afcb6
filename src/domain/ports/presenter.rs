use thiserror::Error;

use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::settings::MonitorSettings;
use crate::domain::value_objects::severity::Severity;

#[derive(Error, Debug)]
pub enum PresentationError {
    #[error("presentation channel unavailable: {0}")]
    ChannelUnavailable(String),
    #[error("failed to display: {0}")]
    DisplayFailed(String),
}

pub trait AlertPresenter: Send + Sync {
    /// Show a dismissible alert. Blocks until the alert is closed where the
    /// backend can report it.
    ///
    /// # Errors
    ///
    /// Returns `PresentationError` if the alert cannot be displayed.
    fn show_alert(&self, alert: &Alert) -> Result<(), PresentationError>;
}

/// Persistent status glyph / tooltip.
pub trait StatusIndicator: Send + Sync {
    fn update(&self, severity: Severity, text: &str);
}

pub trait SettingsForm: Send + Sync {
    /// Show a modal settings form prefilled from `current`.
    ///
    /// Returns `Ok(None)` when the user cancels.
    ///
    /// # Errors
    ///
    /// Returns `PresentationError` if the form cannot be shown.
    fn edit(&self, current: &MonitorSettings) -> Result<Option<MonitorSettings>, PresentationError>;
}
