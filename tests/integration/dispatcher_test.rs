#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use ramwatch::application::services::config_store::ConfigStore;
use ramwatch::application::services::dispatcher::{DispatchOutcome, NotificationDispatcher};
use ramwatch::domain::entities::alert::Alert;
use ramwatch::domain::entities::sample::MemorySample;
use ramwatch::domain::ports::presenter::{AlertPresenter, PresentationError};
use ramwatch::domain::value_objects::settings::MonitorSettings;
use ramwatch::domain::value_objects::severity::Severity;
use ramwatch::domain::value_objects::thresholds::Thresholds;

const WAIT: Duration = Duration::from_secs(5);

/// Keeps the alert "open" until the test releases it.
struct GatedPresenter {
    shown: AtomicUsize,
    opened: Mutex<mpsc::Sender<()>>,
    close: Mutex<mpsc::Receiver<()>>,
}

impl AlertPresenter for GatedPresenter {
    fn show_alert(&self, _alert: &Alert) -> Result<(), PresentationError> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        let _ = self.opened.lock().expect("lock").send(());
        let _ = self.close.lock().expect("lock").recv();
        Ok(())
    }
}

fn gated() -> (Arc<GatedPresenter>, mpsc::Receiver<()>, mpsc::Sender<()>) {
    let (opened_tx, opened_rx) = mpsc::channel();
    let (close_tx, close_rx) = mpsc::channel();
    let presenter = Arc::new(GatedPresenter {
        shown: AtomicUsize::new(0),
        opened: Mutex::new(opened_tx),
        close: Mutex::new(close_rx),
    });
    (presenter, opened_rx, close_tx)
}

fn alert(severity: Severity) -> Alert {
    let sample = MemorySample::from_bytes(95, 100, 5);
    Alert::for_sample(severity, &sample, Thresholds::default())
}

fn store() -> Arc<ConfigStore> {
    Arc::new(ConfigStore::in_memory(MonitorSettings::default()))
}

#[tokio::test]
async fn second_trigger_while_open_is_dropped() {
    let (presenter, opened, close) = gated();
    let dispatcher = NotificationDispatcher::new(presenter.clone(), store());

    assert_eq!(dispatcher.dispatch(alert(Severity::Medium)), DispatchOutcome::Launched);
    opened.recv_timeout(WAIT).expect("alert shown");
    assert!(dispatcher.is_in_flight());

    assert_eq!(dispatcher.dispatch(alert(Severity::Critical)), DispatchOutcome::InFlight);
    assert_eq!(dispatcher.dispatch(alert(Severity::Critical)), DispatchOutcome::InFlight);

    close.send(()).expect("close");
    assert!(dispatcher.wait_idle(WAIT).await);
    assert_eq!(presenter.shown.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dispatch_returns_before_alert_closes() {
    let (presenter, opened, close) = gated();
    let dispatcher = NotificationDispatcher::new(presenter, store());

    assert_eq!(dispatcher.dispatch(alert(Severity::Medium)), DispatchOutcome::Launched);
    opened.recv_timeout(WAIT).expect("alert shown");
    assert!(!dispatcher.wait_idle(Duration::from_millis(50)).await);

    close.send(()).expect("close");
    assert!(dispatcher.wait_idle(WAIT).await);
}

#[tokio::test]
async fn quick_close_still_collapses_within_cooldown() {
    let (presenter, opened, close) = gated();
    let dispatcher = NotificationDispatcher::new(presenter.clone(), store())
        .with_cooldown(Duration::from_secs(30));

    close.send(()).expect("pre-release");
    assert_eq!(dispatcher.dispatch(alert(Severity::Medium)), DispatchOutcome::Launched);
    opened.recv_timeout(WAIT).expect("alert shown");
    assert!(dispatcher.wait_idle(WAIT).await);

    assert_eq!(
        dispatcher.dispatch(alert(Severity::Critical)),
        DispatchOutcome::CoolingDown
    );
    assert_eq!(presenter.shown.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn toggling_notifications_off_takes_effect_immediately() {
    let config = store();
    let (presenter, _opened, _close) = gated();
    let dispatcher = NotificationDispatcher::new(presenter.clone(), Arc::clone(&config));

    let mut settings = config.get();
    settings.notifications_enabled = false;
    config.save(settings).expect("save");

    assert_eq!(dispatcher.dispatch(alert(Severity::Critical)), DispatchOutcome::Disabled);
    assert_eq!(presenter.shown.load(Ordering::SeqCst), 0);
}
