#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::thread;

use ramwatch::application::config::{read_settings, write_settings, ConfigOverrides};
use ramwatch::application::services::config_store::ConfigStore;
use ramwatch::domain::value_objects::settings::MonitorSettings;
use ramwatch::domain::value_objects::thresholds::Thresholds;

#[test]
fn save_then_load_roundtrip_for_valid_configs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let store = ConfigStore::load(path.clone());

    for (medium, critical, interval, enabled) in
        [(10, 11, 1, true), (80, 90, 5, true), (95, 100, 30, false), (42, 77, 13, false)]
    {
        let settings = MonitorSettings::clamped(medium, critical, interval, enabled);
        store.save(settings).expect("save");
        assert_eq!(ConfigStore::load(path.clone()).get(), settings);
    }
}

#[test]
fn clamping_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[general]\ninterval_secs = -4\n[thresholds]\nmedium_percent = 200\ncritical_percent = 5\n",
    )
    .expect("write");

    let settings = ConfigStore::load(path).get();
    assert!(settings.thresholds.medium() <= Thresholds::MEDIUM_MAX);
    assert!(settings.thresholds.critical() > settings.thresholds.medium());
    assert_eq!(settings.poll_interval_secs(), 1);
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "\u{0}\u{1}garbage = = =").expect("write");
    assert_eq!(ConfigStore::load(path).get(), MonitorSettings::default());
}

#[test]
fn overrides_are_never_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let store = ConfigStore::load(path.clone());
    store.apply_overrides(ConfigOverrides {
        threshold: Some(60.0),
        interval_secs: Some(1),
    });
    assert_eq!(store.get().thresholds.critical(), 60);

    let on_disk = read_settings(&path).expect("read");
    assert_eq!(on_disk, MonitorSettings::default());
}

#[test]
fn external_write_is_visible_after_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let store = ConfigStore::load(path.clone());

    let edited = MonitorSettings::clamped(50, 60, 3, false);
    write_settings(&path, &edited).expect("write");
    store.reload();
    assert_eq!(store.get(), edited);
}

#[test]
fn concurrent_saves_and_reads_see_whole_values() {
    let store = Arc::new(ConfigStore::in_memory(MonitorSettings::default()));
    let a = MonitorSettings::clamped(20, 30, 2, true);
    let b = MonitorSettings::clamped(60, 95, 20, false);

    let writers: Vec<_> = [a, b]
        .into_iter()
        .map(|settings| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..200 {
                    store.save(settings).expect("save");
                }
            })
        })
        .collect();

    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..500 {
                let seen = store.get();
                assert!(seen == a || seen == b || seen == MonitorSettings::default());
            }
        })
    };

    for w in writers {
        w.join().expect("writer");
    }
    reader.join().expect("reader");
    let last = store.get();
    assert!(last == a || last == b);
}
