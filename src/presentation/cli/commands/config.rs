use std::sync::Arc;

use anyhow::Context;
use clap::ValueEnum;
use colored::Colorize;

use crate::application::config::SettingsFile;
use crate::application::services::config_store::ConfigStore;
use crate::application::services::windows::{SettingsOutcome, SettingsService, WindowRegistry};
use crate::domain::value_objects::settings::MonitorSettings;
use crate::presentation::settings_form::DialoguerSettingsForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(t: Toggle) -> Self {
        matches!(t, Toggle::On)
    }
}

/// Fields to change with `config set`; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    pub medium: Option<i64>,
    pub critical: Option<i64>,
    pub interval: Option<i64>,
    pub notifications: Option<Toggle>,
}

impl ConfigChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.medium.is_none()
            && self.critical.is_none()
            && self.interval.is_none()
            && self.notifications.is_none()
    }

    /// Merges the changes into `current`, clamping into valid ranges.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn apply(&self, current: MonitorSettings) -> MonitorSettings {
        MonitorSettings::clamped(
            self.medium
                .unwrap_or_else(|| i64::from(current.thresholds.medium())),
            self.critical
                .unwrap_or_else(|| i64::from(current.thresholds.critical())),
            self.interval
                .unwrap_or(current.poll_interval_secs() as i64),
            self.notifications
                .map_or(current.notifications_enabled, bool::from),
        )
    }
}

/// # Errors
///
/// Returns an error if the settings cannot be serialized.
pub fn run_config_show(config: &ConfigStore) -> anyhow::Result<()> {
    let file = SettingsFile::from(&config.get());
    if let Some(path) = config.path() {
        println!("{}", format!("# {}", path.display()).dimmed());
    }
    print!(
        "{}",
        toml::to_string_pretty(&file).context("Failed to serialize settings")?
    );
    Ok(())
}

pub fn run_config_path(config: &ConfigStore) {
    match config.path() {
        Some(path) => println!("{}", path.display()),
        None => println!("(in memory)"),
    }
}

/// # Errors
///
/// Returns an error if the settings file cannot be written.
pub fn run_config_set(config: &ConfigStore, changes: ConfigChanges) -> anyhow::Result<()> {
    if changes.is_empty() {
        println!("{}", "Nothing to change.".yellow());
        return Ok(());
    }
    let updated = changes.apply(config.get());
    config.save(updated).context("Failed to save settings")?;

    let requested_medium = changes.medium.map(|m| m != i64::from(updated.thresholds.medium()));
    let requested_critical = changes
        .critical
        .map(|c| c != i64::from(updated.thresholds.critical()));
    if requested_medium == Some(true) || requested_critical == Some(true) {
        println!(
            "{}",
            format!("Thresholds adjusted into range: {}", updated.thresholds).yellow()
        );
    }
    println!("{}", "Settings saved.".green());
    Ok(())
}

/// Opens the interactive settings form and waits for it to close.
///
/// # Errors
///
/// Returns an error if the form task panics or the save fails.
pub async fn run_config_edit(config: Arc<ConfigStore>) -> anyhow::Result<()> {
    let service = SettingsService::new(
        Arc::new(DialoguerSettingsForm::new()),
        config,
        Arc::new(WindowRegistry::new()),
    );
    let Some(handle) = service.open() else {
        println!("{}", "Settings form already open.".yellow());
        return Ok(());
    };
    match handle.await.context("Settings form task failed")? {
        SettingsOutcome::Saved(settings) => {
            println!(
                "{}",
                format!(
                    "Settings saved: thresholds {}, interval {}s.",
                    settings.thresholds,
                    settings.poll_interval_secs()
                )
                .green()
            );
        }
        SettingsOutcome::Unchanged => println!("No changes."),
        SettingsOutcome::Cancelled => println!("{}", "Cancelled.".yellow()),
        SettingsOutcome::Failed(reason) => anyhow::bail!("Settings not saved: {reason}"),
    }
    Ok(())
}
