//! Command-line interface definitions for samplecmp.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Compare two files
//! samplecmp run1.raw /archive/run1.raw
//!
//! # Compare two directory trees with 20 samples of 1 MB
//! samplecmp /data/run42 /archive/run42 -n 20 --mb 1
//!
//! # Compare files matching a pattern against a directory
//! samplecmp "/data/run42/*.raw" /archive/run42
//!
//! # Look up a dataset and compare its storage and archive directories
//! samplecmp DMS QC_Shew_23_01 --dataset-db datasets.sqlite
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Sampled comparison of large files and directory trees.
///
/// Checks whether the start, the end, and evenly spaced interior sections of
/// two files match, without reading every byte. Small files are compared in
/// full.
#[derive(Debug, Parser)]
#[command(name = "samplecmp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Base file, directory, wildcard pattern, or the word DMS
    #[arg(value_name = "BASE")]
    pub base: String,

    /// Comparison file or directory, or a dataset name when BASE is DMS
    #[arg(value_name = "COMPARISON")]
    pub comparison: String,

    /// Number of portions of each file to examine (minimum 2: beginning and end)
    #[arg(short = 'n', long = "samples", value_name = "N")]
    pub samples: Option<usize>,

    /// Bytes to read from each file portion. Largest byte value wins.
    #[arg(long, value_name = "BYTES")]
    pub bytes: Option<u64>,

    /// Kilobytes to read from each file portion (default 512). Largest byte value wins.
    #[arg(long = "kb", value_name = "KB")]
    pub kb: Option<u64>,

    /// Megabytes to read from each file portion. Largest byte value wins.
    #[arg(long = "mb", value_name = "MB")]
    pub mb: Option<u64>,

    /// Gigabytes to read from each file portion. Largest byte value wins.
    #[arg(long = "gb", value_name = "GB")]
    pub gb: Option<u64>,

    /// Mirror warnings and errors to a log file, optionally at PATH
    #[arg(short = 'l', long = "log", value_name = "PATH", num_args = 0..=1)]
    pub log: Option<Option<PathBuf>>,

    /// Directory for the log file (implies --log)
    #[arg(long = "log-dir", visible_alias = "log-folder", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database used to resolve dataset names
    #[arg(long, value_name = "PATH")]
    pub dataset_db: Option<PathBuf>,

    /// Output format for the run report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Sample size requested on the command line, in bytes.
    ///
    /// Each unit flag contributes a byte value; the largest one wins.
    /// Returns `None` when no size flag was given.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use samplecmp::cli::Cli;
    ///
    /// let cli = Cli::try_parse_from(["samplecmp", "a", "b", "--bytes", "4096", "--kb", "2"]).unwrap();
    /// assert_eq!(cli.sample_size_bytes(), Some(4096));
    /// ```
    #[must_use]
    pub fn sample_size_bytes(&self) -> Option<u64> {
        [
            (self.bytes, 1),
            (self.kb, KB),
            (self.mb, MB),
            (self.gb, GB),
        ]
        .into_iter()
        .filter_map(|(value, multiplier)| value.map(|v| v.saturating_mul(multiplier)))
        .max()
    }
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
