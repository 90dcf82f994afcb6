#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use ramwatch::application::services::config_store::ConfigStore;
use ramwatch::application::services::dispatcher::NotificationDispatcher;
use ramwatch::application::services::monitor::MonitorService;
use ramwatch::application::services::scheduler::{LoopState, Scheduler, StopOutcome};
use ramwatch::domain::entities::alert::Alert;
use ramwatch::domain::entities::sample::MemorySample;
use ramwatch::domain::ports::presenter::{AlertPresenter, PresentationError, StatusIndicator};
use ramwatch::domain::ports::sampler::{MemorySampler, SamplingError};
use ramwatch::domain::value_objects::settings::MonitorSettings;
use ramwatch::domain::value_objects::severity::Severity;
use ramwatch::infrastructure::os::instance_lock::InstanceLock;
use ramwatch::presentation::cli::runtime::block_on_bounded;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

struct CriticalSampler {
    calls: AtomicUsize,
}

impl MemorySampler for CriticalSampler {
    fn sample(&self) -> Result<MemorySample, SamplingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(MemorySample::from_bytes(97, 100, 3))
    }
}

#[derive(Default)]
struct CountingPresenter {
    shown: AtomicUsize,
}

impl AlertPresenter for CountingPresenter {
    fn show_alert(&self, _alert: &Alert) -> Result<(), PresentationError> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Stands in for an OS call or a dialog that does not come back.
const STUCK_FOR: Duration = Duration::from_secs(4);

struct WedgedSampler;

impl MemorySampler for WedgedSampler {
    fn sample(&self) -> Result<MemorySample, SamplingError> {
        std::thread::sleep(STUCK_FOR);
        Ok(MemorySample::from_bytes(50, 100, 50))
    }
}

struct UndismissedPresenter;

impl AlertPresenter for UndismissedPresenter {
    fn show_alert(&self, _alert: &Alert) -> Result<(), PresentationError> {
        std::thread::sleep(STUCK_FOR);
        Ok(())
    }
}

#[derive(Default)]
struct LastStatus(Mutex<Option<Severity>>);

impl StatusIndicator for LastStatus {
    fn update(&self, severity: Severity, _text: &str) {
        *self.0.lock().expect("lock") = Some(severity);
    }
}

// ---------------------------------------------------------------------------
// Single instance
// ---------------------------------------------------------------------------

#[test]
fn second_acquire_while_held_returns_false() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ramwatch.lock");
    let first = InstanceLock::new(path.clone());
    let second = InstanceLock::new(path);

    assert!(first.acquire().expect("first"));
    assert!(!second.acquire().expect("second"));

    first.release();
    assert!(second.acquire().expect("after release"));
}

// ---------------------------------------------------------------------------
// Poll loop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loop_runs_alerts_once_and_stops_cleanly() {
    let sampler = Arc::new(CriticalSampler {
        calls: AtomicUsize::new(0),
    });
    let presenter = Arc::new(CountingPresenter::default());
    let status = Arc::new(LastStatus::default());
    let config = Arc::new(ConfigStore::in_memory(MonitorSettings::clamped(70, 90, 1, true)));
    let dispatcher = Arc::new(
        NotificationDispatcher::new(presenter.clone(), Arc::clone(&config))
            .with_cooldown(Duration::ZERO),
    );
    let service = Arc::new(MonitorService::new(
        sampler.clone(),
        config,
        dispatcher,
        status.clone(),
    ));

    let scheduler = Scheduler::new();
    scheduler.start(service).expect("start");
    tokio::time::sleep(Duration::from_millis(2_300)).await;

    assert_eq!(
        scheduler.stop(Duration::from_secs(2)).await,
        StopOutcome::Stopped
    );
    assert_eq!(scheduler.state(), LoopState::Stopped);
    assert!(sampler.calls.load(Ordering::SeqCst) >= 2);
    assert_eq!(presenter.shown.load(Ordering::SeqCst), 1);
    assert_eq!(*status.0.lock().expect("lock"), Some(Severity::Critical));
}

#[tokio::test]
async fn interval_change_applies_on_next_cycle() {
    let sampler = Arc::new(CriticalSampler {
        calls: AtomicUsize::new(0),
    });
    let config = Arc::new(ConfigStore::in_memory(MonitorSettings::clamped(70, 90, 30, false)));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(CountingPresenter::default()),
        Arc::clone(&config),
    ));
    let service = Arc::new(MonitorService::new(
        sampler.clone(),
        Arc::clone(&config),
        dispatcher,
        Arc::new(LastStatus::default()),
    ));

    assert_eq!(service.poll_interval(), Duration::from_secs(30));
    config
        .save(MonitorSettings::clamped(70, 90, 1, false))
        .expect("save");
    assert_eq!(service.poll_interval(), Duration::from_secs(1));

    let scheduler = Scheduler::new();
    scheduler.start(service).expect("start");
    tokio::time::sleep(Duration::from_millis(1_300)).await;
    scheduler.stop(Duration::from_secs(2)).await;
    assert!(sampler.calls.load(Ordering::SeqCst) >= 2);
}

// ---------------------------------------------------------------------------
// Teardown
// ---------------------------------------------------------------------------

#[test]
fn wedged_sampler_and_open_alert_do_not_hold_up_exit() {
    let started = Instant::now();
    let outcome = block_on_bounded(
        async {
            let config = Arc::new(ConfigStore::in_memory(MonitorSettings::clamped(70, 90, 1, true)));
            let dispatcher = Arc::new(NotificationDispatcher::new(
                Arc::new(UndismissedPresenter),
                Arc::clone(&config),
            ));
            let sample = MemorySample::from_bytes(95, 100, 5);
            dispatcher.dispatch(Alert::for_sample(
                Severity::Critical,
                &sample,
                config.get().thresholds,
            ));
            assert!(dispatcher.is_in_flight());

            let service = Arc::new(MonitorService::new(
                Arc::new(WedgedSampler),
                config,
                dispatcher,
                Arc::new(LastStatus::default()),
            ));
            let scheduler = Scheduler::new();
            scheduler.start(service).expect("start");
            tokio::time::sleep(Duration::from_millis(100)).await;
            scheduler.stop(Duration::from_millis(200)).await
        },
        Duration::from_millis(300),
    )
    .expect("runtime");

    assert_eq!(outcome, StopOutcome::TimedOut);
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "teardown took {:?}",
        started.elapsed()
    );
}
