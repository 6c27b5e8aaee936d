//! Configuration loading and root folder resolution
//!
//! Tests that manipulate EVENTDESK_ROOT_FOLDER are marked with #[serial]
//! so they never race each other.

use eventdesk_common::config::{resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
#[serial]
fn test_cli_argument_wins_over_everything() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/eventdesk-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/eventdesk-toml")),
        ..TomlConfig::default()
    };

    let resolved = resolve_root_folder(Some(Path::new("/tmp/eventdesk-cli")), &config);
    assert_eq!(resolved, PathBuf::from("/tmp/eventdesk-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_var_wins_over_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/eventdesk-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/eventdesk-toml")),
        ..TomlConfig::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/tmp/eventdesk-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_no_overrides() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/eventdesk-toml")),
        ..TomlConfig::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/tmp/eventdesk-toml"));
}

#[test]
#[serial]
fn test_default_root_folder_is_not_empty() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert!(!resolved.as_os_str().is_empty());
}

#[test]
fn test_load_explicit_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
port = 6000
api_token = "secret"
utc_offset_minutes = 60

[logging]
level = "debug"

[bridge]
base_url = "http://10.0.0.5:5000"
poll_interval_ms = 250
"#,
    )
    .unwrap();

    let config = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(config.port, 6000);
    assert_eq!(config.api_token.as_deref(), Some("secret"));
    assert_eq!(config.utc_offset_minutes, 60);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.bridge.base_url, "http://10.0.0.5:5000");
    assert_eq!(config.bridge.poll_interval_ms, 250);
    assert_eq!(config.bridge.request_timeout_ms, 3000);
}

#[test]
fn test_load_missing_explicit_file_is_error() {
    let temp = tempfile::tempdir().unwrap();
    let result = TomlConfig::load(Some(&temp.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    let result = TomlConfig::load(Some(&path));
    assert!(matches!(result, Err(eventdesk_common::Error::Config(_))));
}
