//! Run report formatting.
//!
//! A [`RunReport`] captures what was compared and how it turned out. It is
//! printed either as a colored human-readable summary or as JSON for
//! scripting.
//!
//! # JSON Schema
//!
//! ```json
//! {
//!   "mode": "directories",
//!   "base": "/data/run42",
//!   "comparison": "/archive/run42",
//!   "matched": false,
//!   "detail": "Directories do not match; Mis-matched file count: 1; Matched file count: 3",
//!   "outcome": null,
//!   "tally": { "total_source_files": 4, "matched": 3, "missing": 0, "mismatched": 1 },
//!   "exit_code": 1,
//!   "exit_code_name": "SC001",
//!   "finished_at": "2024-03-07T10:15:00+00:00"
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Local};
use serde::Serialize;
use yansi::{Paint, Style};

use crate::cli::OutputFormat;
use crate::compare::{CompareSettings, Outcome};
use crate::error::ExitCode;
use crate::reconcile::Tally;

/// Which kind of comparison a run performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One file against another
    Files,
    /// A directory tree against another
    Directories,
    /// Files matching a pattern against a directory
    Wildcard,
    /// Directories resolved from a dataset name
    Dataset,
    /// The arguments could not be classified
    Invalid,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Files => "files",
            Mode::Directories => "directories",
            Mode::Wildcard => "wildcard",
            Mode::Dataset => "dataset",
            Mode::Invalid => "invalid",
        };
        write!(f, "{name}")
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: Mode,
    pub base: String,
    pub comparison: String,
    pub matched: bool,
    /// Human-readable verdict
    pub detail: String,
    /// Outcome of a single file comparison
    pub outcome: Option<Outcome>,
    /// Counts for directory, wildcard, and dataset runs
    pub tally: Option<Tally>,
    pub sample_count: usize,
    pub sample_size_bytes: u64,
    pub exit_code: i32,
    pub exit_code_name: String,
    pub finished_at: DateTime<Local>,
    #[serde(skip)]
    pub code: ExitCode,
}

impl RunReport {
    /// Create a report stamped with the current time.
    #[must_use]
    pub fn new(
        mode: Mode,
        base: impl Into<String>,
        comparison: impl Into<String>,
        settings: CompareSettings,
        code: ExitCode,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            base: base.into(),
            comparison: comparison.into(),
            matched: code == ExitCode::Success,
            detail: detail.into(),
            outcome: None,
            tally: None,
            sample_count: settings.sample_count(),
            sample_size_bytes: settings.sample_size_bytes(),
            exit_code: code.as_i32(),
            exit_code_name: code.code_prefix().to_string(),
            finished_at: Local::now(),
            code,
        }
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[must_use]
    pub fn with_tally(mut self, tally: Tally) -> Self {
        self.tally = Some(tally);
        self
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render the human-readable summary.
    #[must_use]
    pub fn to_text(&self, color: bool) -> String {
        let (verdict, style) = if self.matched {
            ("MATCH", Style::new().green().bold())
        } else if self.code == ExitCode::Mismatch {
            ("MISMATCH", Style::new().red().bold())
        } else {
            ("ERROR", Style::new().yellow().bold())
        };

        let mut text = format!(
            "{} {}\n  base:       {}\n  comparison: {}\n",
            paint(verdict, style, color),
            self.detail,
            self.base,
            self.comparison
        );

        if let Some(tally) = self.tally {
            text.push_str(&format!(
                "  files: {} checked, {} matched, {} mismatched, {} missing\n",
                tally.total_source_files, tally.matched, tally.mismatched, tally.missing
            ));
        }
        text
    }
}

fn paint(value: &str, style: Style, color: bool) -> String {
    if color {
        value.paint(style).to_string()
    } else {
        value.to_string()
    }
}

/// Print a report to stdout in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or writing to stdout fails.
pub fn print_report(report: &RunReport, format: OutputFormat, color: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, format, color)
}

/// Write a report to any writer in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    report: &RunReport,
    format: OutputFormat,
    color: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => write!(writer, "{}", report.to_text(color))?,
        OutputFormat::Json => writeln!(writer, "{}", report.to_json_pretty()?)?,
    }
    writer.flush()?;
    Ok(())
}
