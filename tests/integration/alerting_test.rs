#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ramwatch::application::services::config_store::ConfigStore;
use ramwatch::application::services::dispatcher::{DispatchOutcome, NotificationDispatcher};
use ramwatch::application::services::monitor::MonitorService;
use ramwatch::domain::entities::alert::Alert;
use ramwatch::domain::entities::sample::MemorySample;
use ramwatch::domain::escalation::{EscalationTracker, NotificationState};
use ramwatch::domain::ports::presenter::{AlertPresenter, PresentationError, StatusIndicator};
use ramwatch::domain::ports::sampler::{MemorySampler, SamplingError};
use ramwatch::domain::value_objects::settings::MonitorSettings;
use ramwatch::domain::value_objects::severity::Severity;
use ramwatch::domain::value_objects::thresholds::Thresholds;

const GIB: u64 = 1_073_741_824;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

struct ScriptedSampler {
    percents: Mutex<VecDeque<u64>>,
}

impl ScriptedSampler {
    fn new(percents: &[u64]) -> Self {
        Self {
            percents: Mutex::new(percents.iter().copied().collect()),
        }
    }
}

impl MemorySampler for ScriptedSampler {
    fn sample(&self) -> Result<MemorySample, SamplingError> {
        let pct = self
            .percents
            .lock()
            .expect("mutex poisoned")
            .pop_front()
            .ok_or_else(|| SamplingError::Unavailable("script exhausted".into()))?;
        Ok(MemorySample::from_bytes(pct * GIB, 100 * GIB, (100 - pct) * GIB))
    }
}

#[derive(Default)]
struct RecordingPresenter {
    shown: Mutex<Vec<Severity>>,
}

impl AlertPresenter for RecordingPresenter {
    fn show_alert(&self, alert: &Alert) -> Result<(), PresentationError> {
        self.shown.lock().expect("mutex poisoned").push(alert.severity);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingStatus {
    tiers: Mutex<Vec<Severity>>,
}

impl StatusIndicator for RecordingStatus {
    fn update(&self, severity: Severity, _text: &str) {
        self.tiers.lock().expect("mutex poisoned").push(severity);
    }
}

fn monitor(
    percents: &[u64],
    presenter: Arc<RecordingPresenter>,
    status: Arc<RecordingStatus>,
) -> MonitorService {
    let config = Arc::new(ConfigStore::in_memory(MonitorSettings::clamped(70, 90, 1, true)));
    let dispatcher = Arc::new(
        NotificationDispatcher::new(presenter, Arc::clone(&config)).with_cooldown(Duration::ZERO),
    );
    MonitorService::new(
        Arc::new(ScriptedSampler::new(percents)),
        config,
        dispatcher,
        status,
    )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn below_medium_is_normal_and_rearms() {
    let t = Thresholds::clamped(70, 90);
    let mut tracker = EscalationTracker::new(t);
    tracker.observe(95.0, t);
    for pct in [0.0, 10.0, 50.0, 69.9] {
        let eval = tracker.observe(pct, t);
        assert_eq!(eval.severity, Severity::Normal);
        assert_eq!(eval.fire, None);
        assert_eq!(tracker.state(), NotificationState::ARMED);
    }
}

#[test]
fn one_medium_alert_per_excursion() {
    let t = Thresholds::clamped(70, 90);
    let mut tracker = EscalationTracker::new(t);
    let fires: Vec<_> = [70.0, 75.0, 80.0, 89.9, 71.0]
        .into_iter()
        .filter_map(|pct| tracker.observe(pct, t).fire)
        .collect();
    assert_eq!(fires, vec![Severity::Medium]);
}

#[test]
fn one_critical_alert_per_excursion_sets_medium_flag() {
    let t = Thresholds::clamped(70, 90);
    let mut tracker = EscalationTracker::new(t);
    let fires: Vec<_> = [90.0, 99.0, 100.0, 80.0, 95.0]
        .into_iter()
        .filter_map(|pct| tracker.observe(pct, t).fire)
        .collect();
    assert_eq!(fires, vec![Severity::Critical]);
    assert!(tracker.state().medium_fired);
}

#[test]
fn threshold_edit_rearms_mid_excursion() {
    let store = ConfigStore::in_memory(MonitorSettings::clamped(70, 90, 5, true));
    let sample = MemorySample::from_bytes(95 * GIB, 100 * GIB, 5 * GIB);
    assert_eq!(store.evaluate(&sample).fire, Some(Severity::Critical));
    assert_eq!(store.evaluate(&sample).fire, None);

    store
        .save(MonitorSettings::clamped(65, 90, 5, true))
        .expect("save");
    assert_eq!(store.evaluate(&sample).fire, Some(Severity::Critical));
}

#[tokio::test]
async fn reference_scenario_through_monitor() {
    let presenter = Arc::new(RecordingPresenter::default());
    let status = Arc::new(RecordingStatus::default());
    let svc = monitor(
        &[50, 72, 95, 95, 60, 96],
        Arc::clone(&presenter),
        Arc::clone(&status),
    );

    let mut fires = Vec::new();
    for _ in 0..6 {
        let report = svc.tick().await.expect("tick");
        fires.push(report.evaluation.fire);
        if report.dispatch == Some(DispatchOutcome::Launched) {
            assert!(svc.dispatcher().wait_idle(Duration::from_secs(5)).await);
        }
    }

    assert_eq!(
        fires,
        vec![
            None,
            Some(Severity::Medium),
            Some(Severity::Critical),
            None,
            None,
            Some(Severity::Critical),
        ]
    );
    assert_eq!(
        *presenter.shown.lock().expect("mutex poisoned"),
        vec![Severity::Medium, Severity::Critical, Severity::Critical]
    );
    assert_eq!(
        *status.tiers.lock().expect("mutex poisoned"),
        vec![
            Severity::Normal,
            Severity::Medium,
            Severity::Critical,
            Severity::Critical,
            Severity::Normal,
            Severity::Critical,
        ]
    );
}

#[tokio::test]
async fn disabled_notifications_still_advance_state() {
    let presenter = Arc::new(RecordingPresenter::default());
    let svc = monitor(&[95, 95], Arc::clone(&presenter), Arc::new(RecordingStatus::default()));
    let mut settings = svc.config().get();
    settings.notifications_enabled = false;
    svc.config().save(settings).expect("save");

    let first = svc.tick().await.expect("tick");
    assert_eq!(first.dispatch, Some(DispatchOutcome::Disabled));
    let second = svc.tick().await.expect("tick");
    assert_eq!(second.dispatch, None);
    assert!(presenter.shown.lock().expect("mutex poisoned").is_empty());
}
