//! Logging infrastructure for samplecmp.
//!
//! This module provides structured logging using the `log` facade and `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! When a log file is requested with `--log` or `--log-dir`, warnings and
//! errors are also appended to that file with a timestamp.
//!
//! # Example
//!
//! ```rust,no_run
//! use samplecmp::logging::init_logging;
//!
//! // Initialize with default (info) level, no log file
//! init_logging(0, false, None);
//!
//! // Initialize with verbose mode (-v)
//! init_logging(1, false, None);
//! ```

use chrono::{Local, NaiveDate};
use env_logger::{Builder, Logger};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// This function should be called once at the start of the application,
/// before any logging calls are made. Later calls are ignored.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
/// * `log_file` - Optional file that receives warnings and errors
///
/// The log file receives warnings and errors even when the console filter
/// is stricter, e.g. under `--quiet`.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    configure_format(&mut builder, verbose);

    let (mirror, open_error) = match log_file.map(open_log_file) {
        Some(Ok(file)) => (Some(Mutex::new(file)), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let logger = MirroredLogger::new(builder.build(), mirror);
    let max_level = logger.max_level();
    if log::set_boxed_logger(Box::new(logger)).is_err() {
        return;
    }
    log::set_max_level(max_level);

    if let (Some(path), Some(e)) = (log_file, open_error) {
        log::warn!("Unable to open log file {}: {}", path.display(), e);
    } else if let Some(path) = log_file {
        log::debug!("Mirroring warnings to {}", path.display());
    }

    if use_env {
        log::debug!(
            "Logging initialized from RUST_LOG environment variable: {:?}",
            env::var("RUST_LOG").ok()
        );
    } else {
        log::debug!("Logging initialized at level: {:?}", determine_level(verbose, quiet));
    }
}

/// Console logger plus an optional file that receives every warning and error.
///
/// The console keeps its own filter; the file sees warn+ records regardless.
struct MirroredLogger {
    console: Logger,
    mirror: Option<Mutex<File>>,
}

impl MirroredLogger {
    fn new(console: Logger, mirror: Option<Mutex<File>>) -> Self {
        Self { console, mirror }
    }

    /// Most verbose level either destination wants.
    fn max_level(&self) -> LevelFilter {
        let console = self.console.filter();
        if self.mirror.is_some() {
            console.max(LevelFilter::Warn)
        } else {
            console
        }
    }

    fn write_mirror(&self, record: &Record<'_>) {
        if record.level() > Level::Warn {
            return;
        }
        if let Some(Ok(mut file)) = self.mirror.as_ref().map(Mutex::lock) {
            // A failed mirror write must not drop the console line.
            let _ = writeln!(
                file,
                "{}\t{}\t{}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );
        }
    }
}

impl Log for MirroredLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.console.enabled(metadata) || (self.mirror.is_some() && metadata.level() <= Level::Warn)
    }

    fn log(&self, record: &Record<'_>) {
        self.write_mirror(record);
        // Applies the console filter itself.
        self.console.log(record);
    }

    fn flush(&self) {
        self.console.flush();
        if let Some(Ok(mut file)) = self.mirror.as_ref().map(Mutex::lock) {
            let _ = file.flush();
        }
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Configure the console format.
///
/// Verbose runs include the module path on the console.
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] {}",
                buf.timestamp_seconds(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        }
    });
}

/// Work out where the log file goes, if anywhere.
///
/// Logging to a file is enabled by `--log` (with or without a path) or by
/// `--log-dir`. Without an explicit path the file is named after the day.
/// A relative path is placed inside `log_dir` when one is given.
#[must_use]
pub fn resolve_log_path(
    log: Option<Option<PathBuf>>,
    log_dir: Option<&Path>,
    today: NaiveDate,
) -> Option<PathBuf> {
    if log.is_none() && log_dir.is_none() {
        return None;
    }

    let file = log
        .flatten()
        .unwrap_or_else(|| PathBuf::from(default_log_name(today)));

    match log_dir {
        Some(dir) if file.is_relative() => Some(dir.join(file)),
        _ => Some(file),
    }
}

/// Default log file name for a given day.
#[must_use]
pub fn default_log_name(day: NaiveDate) -> String {
    format!("samplecmp_log_{}.txt", day.format("%Y-%m-%d"))
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
