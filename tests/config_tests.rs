//! Integration tests for configuration layering.
//!
//! These tests verify defaults, TOML file parsing, environment variable
//! overrides, and CLI flag overrides.

use clap::Parser;
use samplecmp::cli::Cli;
use samplecmp::config::Config;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

// =============================================================================
// Helper Functions
// =============================================================================

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all SAMPLECMP_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("SAMPLECMP_") {
            std::env::remove_var(key);
        }
    }
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn test_missing_file_gives_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let config = Config::load_from_path(&dir.path().join("absent.toml"));

    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
sample_count = 20
sample_size_bytes = 1048576
dataset_db = "/srv/dms/datasets.sqlite"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path));

    assert_eq!(config.sample_count, 20);
    assert_eq!(config.sample_size_bytes, 1_048_576);
    assert_eq!(
        config.dataset_db,
        Some(PathBuf::from("/srv/dms/datasets.sqlite"))
    );
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "sample_count = 3\n").unwrap();

    let config = Config::load_from_path(&path);

    assert_eq!(config.sample_count, 3);
    assert_eq!(config.sample_size_bytes, 512 * 1024);
}

#[test]
fn test_invalid_toml_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "sample_count = \"many\"\n").unwrap();

    let config = Config::load_from_path(&path);

    assert_eq!(config, Config::default());
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "sample_count = 3\n").unwrap();

    std::env::set_var("SAMPLECMP_SAMPLE_COUNT", "15");
    let config = Config::load_from_path(&path);
    clear_env();

    assert_eq!(config.sample_count, 15);
}

#[test]
fn test_cli_overrides_env_and_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "sample_count = 3\nsample_size_bytes = 4096\n").unwrap();

    std::env::set_var("SAMPLECMP_SAMPLE_COUNT", "15");
    let mut config = Config::load_from_path(&path);
    clear_env();

    let cli = Cli::try_parse_from(["samplecmp", "a", "b", "-n", "6", "--kb", "8"]).unwrap();
    config.apply_cli(&cli);

    assert_eq!(config.sample_count, 6);
    assert_eq!(config.sample_size_bytes, 8 * 1024);
}

#[test]
fn test_settings_from_config_are_clamped() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "sample_count = 1\nsample_size_bytes = 2147483648\n").unwrap();

    let settings = Config::load_from_path(&path).compare_settings();

    assert_eq!(settings.sample_count(), 2);
    assert_eq!(settings.sample_size_bytes(), 512 * 1024 * 1024);
}
