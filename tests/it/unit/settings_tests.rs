//! Unit tests for settings module.

use sheetlist::constants::DEFAULT_LIST_LIMIT;
use sheetlist::settings::{default_settings_path, ListSettings};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let settings = ListSettings::default();
    assert_eq!(settings.default_limit, DEFAULT_LIST_LIMIT);
    assert_eq!(settings.definition("res.partner").limit, DEFAULT_LIST_LIMIT);
}

#[test]
fn test_default_path() {
    // Should return Some on most systems
    let path = default_settings_path();
    assert!(path.is_some() || cfg!(target_os = "unknown"));
    if let Some(path) = path {
        assert!(path.ends_with("sheetlist/settings.json"));
    }
}

#[test]
fn test_partial_file_uses_defaults_for_missing_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"default_limit": 25}"#).unwrap();

    let settings = ListSettings::load_from(&path).unwrap();
    assert_eq!(settings.default_limit, 25);
    assert_eq!(settings.log_filter, ListSettings::default().log_filter);
    assert_eq!(settings.definition("res.partner").limit, 25);
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();

    let err = ListSettings::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid settings"));
}

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let settings = ListSettings {
        default_limit: 10,
        slow_fetch_ms: 50.0,
        log_filter: "sheetlist=debug".to_string(),
    };

    settings.save_to(&path).unwrap();
    assert_eq!(ListSettings::load_from(&path).unwrap(), settings);
}
