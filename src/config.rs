//! Application configuration management.
//!
//! Settings are layered with figment, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML config file (`--config PATH`, or `config.toml` in the platform
//!    config directory)
//! 3. Environment variables prefixed with `SAMPLECMP_`
//!    (e.g. `SAMPLECMP_SAMPLE_COUNT=20`)
//! 4. CLI flags ([`Config::apply_cli`])
//!
//! Configuration is read once before a run starts and is read-only afterwards.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::compare::{CompareSettings, DEFAULT_SAMPLE_COUNT, DEFAULT_SAMPLE_SIZE_KB};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SAMPLECMP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of windows to examine per file.
    pub sample_count: usize,
    /// Bytes per window.
    pub sample_size_bytes: u64,
    /// SQLite database used to resolve dataset names.
    pub dataset_db: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            sample_size_bytes: DEFAULT_SAMPLE_SIZE_KB * 1024,
            dataset_db: None,
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or from the default platform path
    /// when `path` is `None`.
    ///
    /// Falls back to defaults (plus environment overrides) if the file cannot
    /// be parsed.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from_path(&path),
            None => Self::extract_or_default(Self::base_figment().merge(Env::prefixed(ENV_PREFIX))),
        }
    }

    /// Load the configuration from a specific TOML file.
    ///
    /// A missing file is not an error: defaults and environment variables
    /// still apply.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let figment = Self::base_figment()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::extract_or_default(figment)
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    fn extract_or_default(figment: Figment) -> Self {
        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "samplecmp", "samplecmp")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply CLI flag overrides.
    ///
    /// When any of `--bytes`, `--kb`, `--mb`, or `--gb` is given, the largest
    /// resulting byte value replaces the configured sample size.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(count) = cli.samples {
            self.sample_count = count;
        }
        if let Some(bytes) = cli.sample_size_bytes() {
            self.sample_size_bytes = bytes;
        }
        if let Some(ref db) = cli.dataset_db {
            self.dataset_db = Some(db.clone());
        }
    }

    /// Clamped runtime settings.
    #[must_use]
    pub fn compare_settings(&self) -> CompareSettings {
        CompareSettings::new(self.sample_count, self.sample_size_bytes)
    }
}
