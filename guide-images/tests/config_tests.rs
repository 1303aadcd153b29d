//! Configuration loading and access key resolution
//!
//! Tests that touch UNSPLASH_ACCESS_KEY or GUIDE_CONFIG are marked #[serial]
//! so they never race on the process environment.

use std::path::Path;

use guide_common::config::write_toml_config;
use guide_images::config::{
    load_discovery_config, read_discovery_config, resolve_unsplash_access_key, DiscoveryConfig,
    CONFIG_PATH_ENV, UNSPLASH_KEY_ENV,
};
use serial_test::serial;
use tracing_test::traced_test;

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("guide-images.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_env_key_wins_over_toml() {
    std::env::set_var(UNSPLASH_KEY_ENV, "env-key");
    let key = resolve_unsplash_access_key(Some("toml-key"));
    std::env::remove_var(UNSPLASH_KEY_ENV);

    assert_eq!(key.as_deref(), Some("env-key"));
}

#[test]
#[serial]
fn test_toml_key_used_when_env_missing() {
    std::env::remove_var(UNSPLASH_KEY_ENV);
    assert_eq!(resolve_unsplash_access_key(Some("toml-key")).as_deref(), Some("toml-key"));
}

#[test]
#[serial]
fn test_blank_keys_ignored() {
    std::env::set_var(UNSPLASH_KEY_ENV, "   ");
    let key = resolve_unsplash_access_key(Some(""));
    std::env::remove_var(UNSPLASH_KEY_ENV);

    assert_eq!(key, None);
}

#[test]
#[serial]
fn test_load_from_cli_path() {
    std::env::remove_var(UNSPLASH_KEY_ENV);
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
        unsplash_access_key = "from-file"
        default_limit = 8
        debug_search = true

        [logging]
        level = "warn"
        "#,
    );

    let config = load_discovery_config(Some(&path)).unwrap();

    assert_eq!(config.unsplash_access_key.as_deref(), Some("from-file"));
    assert_eq!(config.default_limit, 8);
    assert_eq!(config.log_directives(), "warn,guide_images=debug");
}

#[test]
#[serial]
fn test_load_from_env_path() {
    std::env::remove_var(UNSPLASH_KEY_ENV);
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "timeout_ms = 1200\n");

    std::env::set_var(CONFIG_PATH_ENV, &path);
    let config = load_discovery_config(None);
    std::env::remove_var(CONFIG_PATH_ENV);

    assert_eq!(config.unwrap().timeout_ms, 1200);
}

#[test]
#[serial]
fn test_missing_file_gives_defaults() {
    std::env::remove_var(UNSPLASH_KEY_ENV);
    let dir = tempfile::tempdir().unwrap();
    let config = load_discovery_config(Some(&dir.path().join("absent.toml"))).unwrap();

    assert_eq!(config, DiscoveryConfig::default());
}

#[test]
#[serial]
fn test_invalid_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "default_limit = \"five\"");

    let err = load_discovery_config(Some(&path)).unwrap_err();
    assert!(matches!(err, guide_common::Error::Config(_)));
}

#[test]
#[serial]
fn test_written_config_round_trips_brand_rules() {
    std::env::remove_var(UNSPLASH_KEY_ENV);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guide-images.toml");

    let mut config = DiscoveryConfig::default();
    config.brand_rules[0].competitors.push("Hatti Kaapi".to_string());
    write_toml_config(&config, &path).unwrap();

    let loaded = load_discovery_config(Some(&path)).unwrap();
    assert_eq!(loaded.brand_rules, config.brand_rules);
}

#[test]
#[serial]
#[traced_test]
fn test_key_in_env_and_toml_warns_after_read() {
    std::env::set_var(UNSPLASH_KEY_ENV, "env-key");
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "unsplash_access_key = \"toml-key\"\n");

    // Reading the file leaves the key untouched and logs nothing about it
    let mut config = read_discovery_config(&path).unwrap();
    assert_eq!(config.unsplash_access_key.as_deref(), Some("toml-key"));
    assert!(!logs_contain("found in environment and TOML"));

    config.resolve_credentials();
    std::env::remove_var(UNSPLASH_KEY_ENV);

    assert_eq!(config.unsplash_access_key.as_deref(), Some("env-key"));
    assert!(logs_contain("found in environment and TOML"));
}

#[test]
#[serial]
#[traced_test]
fn test_missing_key_warns() {
    std::env::remove_var(UNSPLASH_KEY_ENV);
    let mut config = DiscoveryConfig::default();
    config.resolve_credentials();

    assert_eq!(config.unsplash_access_key, None);
    assert!(logs_contain("Unsplash access key not configured"));
}
