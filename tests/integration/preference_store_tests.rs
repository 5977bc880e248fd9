//! Integration tests for the preference store over real files.

use chrono::{TimeZone, Utc};
use ornimetrics::adapters::memory::MemoryPreferences;
use ornimetrics::adapters::prefs_file::JsonFilePreferences;
use ornimetrics::app::ports::{PreferencesError, PreferencesPort};
use ornimetrics::preferences::{PreferenceStore, Preferences, UsageSensitivity};

fn store_at(dir: &tempfile::TempDir) -> (PreferenceStore, std::path::PathBuf) {
    let path = dir.path().join("prefs.json");
    let store = PreferenceStore::open(Box::new(JsonFilePreferences::new(path.clone()))).unwrap();
    (store, path)
}

#[test]
fn first_launch_uses_defaults_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let (store, path) = store_at(&dir);
    assert_eq!(store.current(), &Preferences::default());
    assert!(!path.exists());
}

#[test]
fn update_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _) = store_at(&dir);
    let next = Preferences {
        low_food_threshold_percent: 15.0,
        heavy_use_sensitivity: UsageSensitivity::High,
        weather_cooldown_hours: 6.5,
        ..Default::default()
    };
    store.update(next.clone()).unwrap();
    drop(store);

    let (reopened, _) = store_at(&dir);
    assert_eq!(reopened.snapshot(), next);
}

#[test]
fn mark_cleaned_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, path) = store_at(&dir);
    let at = Utc.with_ymd_and_hms(2025, 4, 20, 17, 30, 0).unwrap();
    store.mark_cleaned(at).unwrap();

    let loaded = JsonFilePreferences::new(path).load().unwrap();
    assert_eq!(loaded.last_cleaned, Some(at));
}

#[test]
fn corrupted_file_falls_back_to_defaults_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, b"{ this is not json").unwrap();

    let (mut store, _) = store_at(&dir);
    assert_eq!(store.current(), &Preferences::default());

    store.update(Preferences { push_enabled: false, ..Default::default() }).unwrap();
    let loaded = JsonFilePreferences::new(path).load().unwrap();
    assert!(!loaded.push_enabled);
}

#[test]
fn invalid_update_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, path) = store_at(&dir);
    store.update(Preferences::default()).unwrap();
    let before = std::fs::read(&path).unwrap();

    let bad = Preferences { heavy_use_cooldown_hours: -1.0, ..Default::default() };
    assert!(matches!(store.update(bad), Err(PreferencesError::ValidationFailed(_))));
    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(store.current(), &Preferences::default());
}

#[test]
fn older_file_with_missing_fields_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, br#"{ "low_food_enabled": false, "cleaning_interval_days": 14 }"#).unwrap();

    let (store, _) = store_at(&dir);
    assert!(!store.current().low_food_enabled);
    assert_eq!(store.current().cleaning_interval_days, 14);
    assert_eq!(store.current().humidity_threshold, 78.0);
}

#[test]
fn corrupted_memory_blob_opens_with_defaults() {
    let backend = MemoryPreferences::with_blob(vec![1, 2, 3, 4, 5]);
    let store = PreferenceStore::open(Box::new(backend)).unwrap();
    assert_eq!(store.current(), &Preferences::default());
}
