use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use crate::domain::entities::sample::MemorySample;
use crate::domain::ports::sampler::MemorySampler;
use crate::domain::value_objects::settings::MonitorSettings;
use crate::domain::value_objects::severity::Severity;
use crate::presentation::cli::formatters::status_fmt::{
    colorize_percent, colorize_severity, print_section_header, progress_bar,
};

/// Snapshot printed by `ramwatch status`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub sample: MemorySample,
    pub severity: Severity,
    pub settings: MonitorSettings,
}

impl StatusReport {
    #[must_use]
    pub fn new(sample: MemorySample, settings: MonitorSettings) -> Self {
        Self {
            severity: settings.thresholds.classify(sample.used_percent),
            sample,
            settings,
        }
    }
}

/// # Errors
///
/// Returns an error if memory sampling or JSON serialization fails.
pub fn run_status(
    sampler: &dyn MemorySampler,
    settings: MonitorSettings,
    json: bool,
) -> anyhow::Result<()> {
    let sample = sampler.sample().context("Failed to read memory statistics")?;
    let report = StatusReport::new(sample, settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_report(&report);
    Ok(())
}

pub fn print_report(report: &StatusReport) {
    let thresholds = report.settings.thresholds;
    let sample = &report.sample;

    println!("{}", "ramwatch status".bold().cyan());
    println!("{}", "━".repeat(50));

    print_section_header("\nMemory");
    println!(
        "  {} {}  {}",
        progress_bar(sample.used_percent, 30, thresholds),
        colorize_percent(sample.used_percent, thresholds),
        colorize_severity(report.severity)
    );
    println!(
        "  Used: {:.2} GiB / {:.2} GiB (available: {:.2} GiB)",
        sample.used_gib(),
        sample.total_gib(),
        sample.available_gib()
    );

    print_section_header("\nSettings");
    println!(
        "  Thresholds: medium {}%, critical {}%",
        thresholds.medium(),
        thresholds.critical()
    );
    println!("  Interval: {}s", report.settings.poll_interval_secs());
    println!(
        "  Notifications: {}",
        if report.settings.notifications_enabled {
            "on".green()
        } else {
            "off".dimmed()
        }
    );
}
