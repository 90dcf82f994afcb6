use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::settings::MonitorSettings;
use crate::domain::value_objects::thresholds::Thresholds;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("config file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk layout of the settings file.
///
/// Integers are read as `i64` so out-of-range values still parse and can be
/// clamped instead of rejecting the whole file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub general: GeneralSection,
    #[serde(default)]
    pub thresholds: ThresholdSection,
    #[serde(default)]
    pub notifications: NotificationSection,
}

/// Polling interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSection {
    #[serde(default = "default_interval")]
    pub interval_secs: i64,
}

/// Alert thresholds, in whole percent of RAM used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSection {
    #[serde(default = "default_medium")]
    pub medium_percent: i64,
    #[serde(default = "default_critical")]
    pub critical_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

// --- Defaults ---

const fn default_interval() -> i64 {
    5
}

const fn default_medium() -> i64 {
    80
}

const fn default_critical() -> i64 {
    90
}

const fn default_true() -> bool {
    true
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

impl Default for ThresholdSection {
    fn default() -> Self {
        Self {
            medium_percent: default_medium(),
            critical_percent: default_critical(),
        }
    }
}

impl Default for NotificationSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl From<&SettingsFile> for MonitorSettings {
    fn from(file: &SettingsFile) -> Self {
        Self::clamped(
            file.thresholds.medium_percent,
            file.thresholds.critical_percent,
            file.general.interval_secs,
            file.notifications.enabled,
        )
    }
}

impl From<&MonitorSettings> for SettingsFile {
    #[allow(clippy::cast_possible_wrap)]
    fn from(settings: &MonitorSettings) -> Self {
        Self {
            general: GeneralSection {
                interval_secs: settings.poll_interval_secs() as i64,
            },
            thresholds: ThresholdSection {
                medium_percent: i64::from(settings.thresholds.medium()),
                critical_percent: i64::from(settings.thresholds.critical()),
            },
            notifications: NotificationSection {
                enabled: settings.notifications_enabled,
            },
        }
    }
}

/// Session-only overrides from the command line. Never written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Critical threshold in percent; medium is lowered to stay below it.
    pub threshold: Option<f64>,
    pub interval_secs: Option<u64>,
}

impl ConfigOverrides {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.threshold.is_none() && self.interval_secs.is_none()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&self, settings: MonitorSettings) -> MonitorSettings {
        let mut out = settings;
        if let Some(threshold) = self.threshold {
            let critical = if threshold.is_nan() {
                i64::from(Thresholds::CRITICAL_MAX)
            } else {
                threshold
                    .clamp(0.0, f64::from(Thresholds::CRITICAL_MAX))
                    .round() as i64
            };
            let medium = i64::from(settings.thresholds.medium()).min(critical.saturating_sub(1));
            out.thresholds = Thresholds::clamped(medium, critical);
        }
        if let Some(secs) = self.interval_secs {
            out = out.with_interval_secs(secs);
        }
        out
    }
}

/// Default settings file location: `<config dir>/ramwatch/config.toml`.
///
/// # Errors
///
/// Returns `ConfigError::NoConfigDir` if the platform has no config directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("ramwatch").join("config.toml"))
}

/// Strict read: any I/O or parse failure is returned.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn read_settings(path: &Path) -> Result<MonitorSettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SettingsFile = toml::from_str(&content)?;
    Ok(MonitorSettings::from(&file))
}

/// Fail-open read used at startup and on reload.
///
/// A missing file yields defaults and is created on a best-effort basis;
/// any other failure is logged and yields defaults.
#[must_use]
pub fn load_settings(path: &Path) -> MonitorSettings {
    if !path.exists() {
        let defaults = MonitorSettings::default();
        match write_settings(path, &defaults) {
            Ok(()) => tracing::info!("Created default settings at {}", path.display()),
            Err(e) => tracing::warn!("Could not create default settings file: {e}"),
        }
        return defaults;
    }
    match read_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Invalid settings file {}, using defaults: {e}", path.display());
            MonitorSettings::default()
        }
    }
}

/// Writes `settings` next to `path` and renames it into place, so an
/// interrupted write never leaves a half-written settings file behind.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, serialization fails,
/// or the temporary file cannot be written or renamed.
pub fn write_settings(path: &Path, settings: &MonitorSettings) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let content = toml::to_string_pretty(&SettingsFile::from(settings))?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, content).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}
