use std::sync::{Mutex, PoisonError};

use colored::Colorize;

use crate::domain::ports::presenter::StatusIndicator;
use crate::domain::value_objects::severity::Severity;

/// Headless stand-in for a tray icon: prints a glyph and tooltip line to
/// stderr whenever the tier or the text changes.
#[derive(Default)]
pub struct TerminalStatusIndicator {
    last: Mutex<Option<(Severity, String)>>,
    quiet: bool,
}

impl TerminalStatusIndicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records updates without printing them.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            last: Mutex::new(None),
            quiet: true,
        }
    }

    /// Last status shown, if any.
    #[must_use]
    pub fn current(&self) -> Option<(Severity, String)> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusIndicator for TerminalStatusIndicator {
    fn update(&self, severity: Severity, text: &str) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last
            .as_ref()
            .is_some_and(|(s, t)| *s == severity && t == text)
        {
            return;
        }
        *last = Some((severity, text.to_string()));
        drop(last);

        if !self.quiet {
            eprintln!("{}", render_status(severity, text));
        }
    }
}

#[must_use]
pub fn render_status(severity: Severity, text: &str) -> String {
    let glyph = match severity {
        Severity::Normal => "\u{25cf}".green(),
        Severity::Medium => "\u{25cf}".yellow(),
        Severity::Critical => "\u{25cf}".red().bold(),
    };
    format!("{glyph} {text}")
}
