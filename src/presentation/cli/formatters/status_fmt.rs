use colored::{ColoredString, Colorize};

use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::Thresholds;

#[must_use]
pub fn progress_bar(value: f64, width: usize, thresholds: Thresholds) -> String {
    let ratio = (value / 100.0).clamp(0.0, 1.0);
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let bar_filled = "█".repeat(filled);
    let bar_empty = "░".repeat(empty);

    format!(
        "{}{bar_empty}",
        paint(bar_filled.as_str(), thresholds.classify(value))
    )
}

#[must_use]
pub fn colorize_percent(value: f64, thresholds: Thresholds) -> ColoredString {
    paint(&format!("{value:.1}%"), thresholds.classify(value))
}

#[must_use]
pub fn colorize_severity(severity: Severity) -> ColoredString {
    paint(&severity.to_string(), severity)
}

fn paint(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => text.red().bold(),
        Severity::Medium => text.yellow(),
        Severity::Normal => text.green(),
    }
}

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}
