use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::ReentrantMutex;

use crate::application::config::{load_settings, write_settings, ConfigError, ConfigOverrides};
use crate::domain::entities::sample::MemorySample;
use crate::domain::escalation::{EscalationTracker, Evaluation, NotificationState};
use crate::domain::value_objects::settings::MonitorSettings;

struct StoreState {
    settings: MonitorSettings,
    tracker: EscalationTracker,
    overrides: ConfigOverrides,
    file_modified: Option<SystemTime>,
}

/// Owner of the live settings and the per-excursion firing history.
///
/// Both live behind one re-entrant lock; callers only ever receive copies.
pub struct ConfigStore {
    path: Option<PathBuf>,
    state: ReentrantMutex<RefCell<StoreState>>,
}

impl ConfigStore {
    /// Loads settings from `path`, falling back to defaults on any failure.
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let settings = load_settings(&path);
        let file_modified = modified_time(&path);
        Self {
            path: Some(path),
            state: ReentrantMutex::new(RefCell::new(StoreState {
                settings,
                tracker: EscalationTracker::new(settings.thresholds),
                overrides: ConfigOverrides::default(),
                file_modified,
            })),
        }
    }

    /// Store with no backing file; `save` only replaces the in-memory copy.
    #[must_use]
    pub fn in_memory(settings: MonitorSettings) -> Self {
        Self {
            path: None,
            state: ReentrantMutex::new(RefCell::new(StoreState {
                settings,
                tracker: EscalationTracker::new(settings.thresholds),
                overrides: ConfigOverrides::default(),
                file_modified: None,
            })),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Snapshot of the effective settings.
    #[must_use]
    pub fn get(&self) -> MonitorSettings {
        self.state.lock().borrow().settings
    }

    #[must_use]
    pub fn notification_state(&self) -> NotificationState {
        self.state.lock().borrow().tracker.state()
    }

    /// Replaces the whole settings value and persists it.
    ///
    /// The in-memory copy changes only after the file write succeeded. A
    /// threshold change re-arms both notification tiers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the settings file cannot be written.
    pub fn save(&self, settings: MonitorSettings) -> Result<(), ConfigError> {
        let guard = self.state.lock();
        if let Some(path) = &self.path {
            write_settings(path, &settings)?;
            guard.borrow_mut().file_modified = modified_time(path);
        }
        self.replace(settings);
        tracing::info!(
            "Settings saved: thresholds {}, interval {}s, notifications {}",
            settings.thresholds,
            settings.poll_interval_secs(),
            if settings.notifications_enabled { "on" } else { "off" }
        );
        Ok(())
    }

    /// Applies session-only overrides on top of the current settings.
    /// They are re-applied after every reload and never persisted.
    pub fn apply_overrides(&self, overrides: ConfigOverrides) {
        let guard = self.state.lock();
        let current = {
            let mut state = guard.borrow_mut();
            state.overrides = overrides;
            state.settings
        };
        self.replace(overrides.apply(current));
    }

    /// Re-reads the settings file if its modification time changed.
    /// Returns true when a reload happened.
    pub fn reload_if_changed(&self) -> bool {
        let Some(path) = &self.path else {
            return false;
        };
        let guard = self.state.lock();
        let current = modified_time(path);
        if current.is_none() || current == guard.borrow().file_modified {
            return false;
        }
        self.reload();
        true
    }

    /// Unconditionally re-reads the settings file (fail-open).
    pub fn reload(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let guard = self.state.lock();
        let loaded = load_settings(path);
        let overrides = {
            let mut state = guard.borrow_mut();
            state.file_modified = modified_time(path);
            state.overrides
        };
        self.replace(overrides.apply(loaded));
        tracing::info!("Settings reloaded from {}", path.display());
    }

    /// Runs one tick of the escalation state machine against the current
    /// thresholds.
    pub fn evaluate(&self, sample: &MemorySample) -> Evaluation {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        let thresholds = state.settings.thresholds;
        state.tracker.observe(sample.used_percent, thresholds)
    }

    fn replace(&self, settings: MonitorSettings) {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        state.settings = settings;
        if state.tracker.sync_thresholds(settings.thresholds) {
            tracing::debug!("Thresholds changed to {}, notifications re-armed", settings.thresholds);
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
