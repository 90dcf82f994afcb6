use notify_rust::{Notification, Timeout, Urgency};

use crate::domain::entities::alert::Alert;
use crate::domain::ports::presenter::{AlertPresenter, PresentationError};
use crate::domain::value_objects::severity::Severity;

const APP_NAME: &str = "ramwatch";
const DISPLAY_TIMEOUT_MS: u32 = 10_000;
const MAX_BODY_CHARS: usize = 250;
const MAX_SUMMARY_CHARS: usize = 100;

/// Desktop toast via the freedesktop notification server.
pub struct DesktopPresenter;

impl DesktopPresenter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DesktopPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertPresenter for DesktopPresenter {
    /// Blocks until the notification is closed (dismissed, clicked or timed
    /// out) on XDG desktops; elsewhere returns once it is shown.
    fn show_alert(&self, alert: &Alert) -> Result<(), PresentationError> {
        let summary = truncate(
            &escape_markup(&format!("{} {}", alert.severity.emoji(), alert.title)),
            MAX_SUMMARY_CHARS,
        );
        let body = truncate(&escape_markup(&alert.body), MAX_BODY_CHARS);

        let handle = Notification::new()
            .appname(APP_NAME)
            .summary(&summary)
            .body(&body)
            .icon("dialog-warning")
            .urgency(severity_to_urgency(alert.severity))
            .timeout(Timeout::Milliseconds(DISPLAY_TIMEOUT_MS))
            .show()
            .map_err(|e| {
                PresentationError::ChannelUnavailable(format!(
                    "desktop notification server unreachable: {e}"
                ))
            })?;

        #[cfg(all(unix, not(target_os = "macos")))]
        handle.wait_for_action(|action| {
            tracing::debug!("Alert closed ({action})");
        });
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        drop(handle);

        Ok(())
    }
}

#[must_use]
const fn severity_to_urgency(severity: Severity) -> Urgency {
    match severity {
        Severity::Critical => Urgency::Critical,
        Severity::Medium => Urgency::Normal,
        Severity::Normal => Urgency::Low,
    }
}

// Truncates on Unicode scalar values (not grapheme clusters).
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_owned()
    } else {
        let mut result: String = s.chars().take(max_chars - 1).collect();
        result.push('\u{2026}');
        result
    }
}

fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
