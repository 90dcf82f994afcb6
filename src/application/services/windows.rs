use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use super::config_store::ConfigStore;
use crate::domain::ports::presenter::SettingsForm;
use crate::domain::value_objects::settings::MonitorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Settings,
    About,
}

/// One "already open" flag per window kind, each behind its own lock.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    settings: Arc<Mutex<bool>>,
    about: Arc<Mutex<bool>>,
}

/// Held for as long as a window is open; dropping it frees the slot.
#[derive(Debug)]
pub struct WindowGuard {
    kind: WindowKind,
    flag: Arc<Mutex<bool>>,
}

impl Drop for WindowGuard {
    fn drop(&mut self) {
        *self.flag.lock().unwrap_or_else(PoisonError::into_inner) = false;
        tracing::debug!("{:?} window closed", self.kind);
    }
}

impl WindowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, kind: WindowKind) -> &Arc<Mutex<bool>> {
        match kind {
            WindowKind::Settings => &self.settings,
            WindowKind::About => &self.about,
        }
    }

    /// Claims the slot for `kind`. Returns `None` if one is already open.
    #[must_use]
    pub fn try_open(&self, kind: WindowKind) -> Option<WindowGuard> {
        let flag = self.flag(kind);
        let mut open = flag.lock().unwrap_or_else(PoisonError::into_inner);
        if *open {
            tracing::debug!("{kind:?} window already open");
            return None;
        }
        *open = true;
        Some(WindowGuard {
            kind,
            flag: Arc::clone(flag),
        })
    }

    #[must_use]
    pub fn is_open(&self, kind: WindowKind) -> bool {
        *self.flag(kind).lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `show` while holding the slot for `kind`.
    pub fn with_window<R>(&self, kind: WindowKind, show: impl FnOnce() -> R) -> Option<R> {
        let _guard = self.try_open(kind)?;
        Some(show())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    Saved(MonitorSettings),
    Unchanged,
    Cancelled,
    Failed(String),
}

/// Opens the settings form and writes the result through the config store.
pub struct SettingsService {
    form: Arc<dyn SettingsForm>,
    config: Arc<ConfigStore>,
    windows: Arc<WindowRegistry>,
}

impl SettingsService {
    #[must_use]
    pub fn new(
        form: Arc<dyn SettingsForm>,
        config: Arc<ConfigStore>,
        windows: Arc<WindowRegistry>,
    ) -> Self {
        Self {
            form,
            config,
            windows,
        }
    }

    /// Launches the form on a detached blocking task. Returns `None` when a
    /// settings window is already open. The handle may be dropped.
    #[must_use]
    pub fn open(&self) -> Option<JoinHandle<SettingsOutcome>> {
        let guard = self.windows.try_open(WindowKind::Settings)?;
        let form = Arc::clone(&self.form);
        let config = Arc::clone(&self.config);
        Some(tokio::task::spawn_blocking(move || {
            let _guard = guard;
            edit_and_save(form.as_ref(), &config)
        }))
    }
}

fn edit_and_save(form: &dyn SettingsForm, config: &ConfigStore) -> SettingsOutcome {
    let current = config.get();
    match form.edit(&current) {
        Ok(None) => SettingsOutcome::Cancelled,
        Ok(Some(updated)) if updated == current => SettingsOutcome::Unchanged,
        Ok(Some(updated)) => match config.save(updated) {
            Ok(()) => SettingsOutcome::Saved(updated),
            Err(e) => {
                tracing::error!("Failed to save settings: {e}");
                SettingsOutcome::Failed(e.to_string())
            }
        },
        Err(e) => {
            tracing::error!("Settings form failed: {e}");
            SettingsOutcome::Failed(e.to_string())
        }
    }
}
