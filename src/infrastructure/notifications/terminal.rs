use std::borrow::Cow;

use colored::Colorize;

use crate::domain::entities::alert::Alert;
use crate::domain::ports::presenter::{AlertPresenter, PresentationError};
use crate::domain::value_objects::severity::Severity;

const SEPARATOR_WIDTH: usize = 60;

/// Prints alerts as a coloured banner on stdout.
pub struct TerminalPresenter;

impl TerminalPresenter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertPresenter for TerminalPresenter {
    fn show_alert(&self, alert: &Alert) -> Result<(), PresentationError> {
        println!("{}", render_alert(alert));
        Ok(())
    }
}

/// Banner text for `alert`, separators included.
#[must_use]
pub fn render_alert(alert: &Alert) -> String {
    let separator = "\u{2500}".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", separator.dimmed()));
    out.push_str(&format!(
        "{} {}  {}\n",
        severity_badge(alert.severity),
        sanitize(&alert.title).bold(),
        alert.timestamp.format("%H:%M:%S").to_string().dimmed()
    ));
    out.push_str(&format!("{}\n", separator.dimmed()));
    for line in sanitize(&alert.body).lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str(&format!("{}\n", separator.dimmed()));
    out
}

/// Strip ANSI escape sequences and C0 control characters, keeping newlines
/// and tabs.
pub(crate) fn sanitize(s: &str) -> Cow<'_, str> {
    if s.bytes()
        .any(|b| matches!(b, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
    {
        Cow::Owned(
            s.chars()
                .filter(|&c| !matches!(c as u32, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
                .collect(),
        )
    } else {
        Cow::Borrowed(s)
    }
}

#[must_use]
pub(crate) fn severity_badge(severity: Severity) -> String {
    let label = format!(" {} {} ", severity.emoji(), severity);
    match severity {
        Severity::Critical => label.on_red().white().bold().to_string(),
        Severity::Medium => label.on_bright_yellow().black().to_string(),
        Severity::Normal => label.on_green().black().to_string(),
    }
}
