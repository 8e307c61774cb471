//! Integration tests for Settings config loading.
//!
//! These tests write local config files into temp directories only; they do
//! not touch the global config or COMPTREE_* environment variables (see
//! config_env_test.rs).

use std::fs;

use tempfile::TempDir;

use comptree::config::{local_config_path, Settings};
use comptree::{ApplicationError, Component, History, ObserverHandle, RecordingObserver, TreeStore};
use comptree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[test]
fn given_dir_without_config_when_load_then_uses_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.history.limit, 64);
    assert!(!settings.render.show_ids);
}

#[test]
fn given_local_config_when_load_then_overrides_specified_fields_only() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
[store]
strict_detach = true

[render]
max_depth = 3
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert!(settings.store.strict_detach);
    assert_eq!(settings.render.max_depth, Some(3));
    assert_eq!(settings.history.limit, 64, "unspecified field keeps default");
}

#[test]
fn given_zero_history_limit_when_load_file_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zero.toml");
    fs::write(&path, "[history]\nlimit = 0\n").unwrap();

    let err = Settings::load_file(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_malformed_toml_when_load_file_then_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[history\nlimit = ").unwrap();

    let err = Settings::load_file(&path).unwrap_err();

    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_strict_config_when_store_built_then_detach_miss_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strict.toml");
    fs::write(&path, "[store]\nstrict_detach = true\n").unwrap();
    let settings = Settings::load_file(&path).unwrap();

    let c = Component::file("c");
    let store = TreeStore::new()
        .with_settings(settings.store)
        .attach(&c, ObserverHandle::new(RecordingObserver::new()));

    assert!(store
        .detach(&c, &ObserverHandle::new(RecordingObserver::new()))
        .is_err());
}

#[test]
fn given_history_limit_in_config_when_history_built_then_limit_applies() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.toml");
    fs::write(&path, "[history]\nlimit = 2\n").unwrap();
    let settings = Settings::load_file(&path).unwrap();

    let root = Component::folder("root");
    let mut history = History::new(TreeStore::new(), &settings.history);
    for name in ["a", "b", "c"] {
        let next = history.current().add(&root, Component::file(name));
        history.commit(name, next);
    }

    assert_eq!(history.len(), 2);
}
