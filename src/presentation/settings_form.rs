use dialoguer::{Confirm, Input};

use crate::domain::ports::presenter::{PresentationError, SettingsForm};
use crate::domain::value_objects::settings::MonitorSettings;
use crate::domain::value_objects::thresholds::Thresholds;

/// Interactive terminal form for the four settings.
pub struct DialoguerSettingsForm;

impl DialoguerSettingsForm {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DialoguerSettingsForm {
    fn default() -> Self {
        Self::new()
    }
}

fn display_failed(e: dialoguer::Error) -> PresentationError {
    PresentationError::DisplayFailed(e.to_string())
}

fn in_range<T: PartialOrd + std::fmt::Display>(value: &T, min: T, max: T) -> Result<(), String> {
    if *value >= min && *value <= max {
        Ok(())
    } else {
        Err(format!("must be between {min} and {max}"))
    }
}

impl SettingsForm for DialoguerSettingsForm {
    fn edit(&self, current: &MonitorSettings) -> Result<Option<MonitorSettings>, PresentationError> {
        let medium: u8 = Input::new()
            .with_prompt("Medium threshold (%)")
            .default(current.thresholds.medium())
            .validate_with(|v: &u8| in_range(v, Thresholds::MEDIUM_MIN, Thresholds::MEDIUM_MAX))
            .interact_text()
            .map_err(display_failed)?;

        let critical_min = medium + 1;
        let critical: u8 = Input::new()
            .with_prompt("Critical threshold (%)")
            .default(current.thresholds.critical().max(critical_min))
            .validate_with(move |v: &u8| in_range(v, critical_min, Thresholds::CRITICAL_MAX))
            .interact_text()
            .map_err(display_failed)?;

        let interval: u64 = Input::new()
            .with_prompt("Poll interval (seconds)")
            .default(current.poll_interval_secs())
            .validate_with(|v: &u64| {
                in_range(
                    v,
                    MonitorSettings::INTERVAL_MIN_SECS,
                    MonitorSettings::INTERVAL_MAX_SECS,
                )
            })
            .interact_text()
            .map_err(display_failed)?;

        let enabled = Confirm::new()
            .with_prompt("Enable notifications?")
            .default(current.notifications_enabled)
            .interact()
            .map_err(display_failed)?;

        let save = Confirm::new()
            .with_prompt("Save these settings?")
            .default(true)
            .interact()
            .map_err(display_failed)?;
        if !save {
            return Ok(None);
        }

        Ok(Some(
            MonitorSettings::clamped(i64::from(medium), i64::from(critical), 0, enabled)
                .with_interval_secs(interval),
        ))
    }
}
