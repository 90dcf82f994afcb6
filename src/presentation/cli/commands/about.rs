use colored::Colorize;

use crate::application::services::windows::{WindowKind, WindowRegistry};

#[must_use]
pub fn about_text() -> String {
    format!(
        "{} {}\n{}\n\nSamples RAM usage every few seconds and raises one alert per\n\
         threshold crossing (medium and critical), with a cooldown between alerts.\n\
         Settings: `ramwatch config path`.",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
    )
}

/// Prints the about box unless one is already being shown.
pub fn run_about(windows: &WindowRegistry) {
    let shown = windows.with_window(WindowKind::About, || {
        println!("{}", "━".repeat(50).cyan());
        println!("{}", about_text());
        println!("{}", "━".repeat(50).cyan());
    });
    if shown.is_none() {
        tracing::debug!("About window already open");
    }
}
