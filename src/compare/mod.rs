//! Sampled comparison of file pairs.
//!
//! This module provides functionality for:
//! - Choosing which byte windows of a file to examine ([`sampler`])
//! - Comparing a byte range of two open streams in bounded chunks ([`range`])
//! - Orchestrating length checks, strategy selection, and verdicts for one
//!   file pair ([`file`])
//!
//! # Example
//!
//! ```no_run
//! use samplecmp::compare::{CompareSettings, FileComparator};
//! use std::path::Path;
//!
//! let comparator = FileComparator::new(CompareSettings::new(10, 512 * 1024));
//! let result = comparator.compare_files(Path::new("a.raw"), Path::new("b.raw"));
//! println!("{}: {}", result.is_match(), result.detail);
//! ```

pub mod file;
pub mod range;
pub mod sampler;

use serde::Serialize;

pub use file::FileComparator;
pub use range::{RangeComparator, Span, StatusThrottle};
pub use sampler::SampleSelector;

/// Default number of samples (start, end, and 8 interior windows).
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// Default sample size, in KB.
pub const DEFAULT_SAMPLE_SIZE_KB: u64 = 512;

/// Fewest samples allowed: one for the beginning and one for the end.
pub const MIN_SAMPLE_COUNT: usize = 2;

/// Smallest sample window, in bytes.
pub const MIN_SAMPLE_SIZE_BYTES: u64 = 64;

/// Largest sample window, in bytes (512 MB).
pub const MAX_SAMPLE_SIZE_BYTES: u64 = 512 * 1024 * 1024;

/// Runtime comparison parameters.
///
/// Out-of-range values are clamped on construction, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompareSettings {
    sample_count: usize,
    sample_size_bytes: u64,
}

impl CompareSettings {
    /// Create settings, clamping the count to at least 2 and the size to
    /// [64 B, 512 MB].
    ///
    /// # Examples
    ///
    /// ```
    /// use samplecmp::compare::CompareSettings;
    ///
    /// let settings = CompareSettings::new(0, 1);
    /// assert_eq!(settings.sample_count(), 2);
    /// assert_eq!(settings.sample_size_bytes(), 64);
    /// ```
    #[must_use]
    pub fn new(sample_count: usize, sample_size_bytes: u64) -> Self {
        Self {
            sample_count: sample_count.max(MIN_SAMPLE_COUNT),
            sample_size_bytes: sample_size_bytes.clamp(MIN_SAMPLE_SIZE_BYTES, MAX_SAMPLE_SIZE_BYTES),
        }
    }

    /// Number of windows to examine per file.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Bytes compared per window.
    #[must_use]
    pub fn sample_size_bytes(&self) -> u64 {
        self.sample_size_bytes
    }

    /// Human-readable sample size, e.g. `512.0 KiB`.
    #[must_use]
    pub fn sample_size_display(&self) -> String {
        bytesize::ByteSize::b(self.sample_size_bytes).to_string()
    }
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_COUNT, DEFAULT_SAMPLE_SIZE_KB * 1024)
    }
}

/// A contiguous byte range selected for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleWindow {
    /// File-relative start position
    pub offset: u64,
    /// Number of bytes in the window
    pub length: u64,
}

impl SampleWindow {
    #[must_use]
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

/// Position of a window within the ordered sample list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLabel {
    Start,
    End,
    /// 1-based interior window index, left to right.
    Interior(usize),
}

impl WindowLabel {
    /// Label for the window at `index` in the list produced by [`SampleSelector`].
    #[must_use]
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => Self::Start,
            1 => Self::End,
            n => Self::Interior(n - 1),
        }
    }
}

impl std::fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowLabel::Start => write!(f, "start"),
            WindowLabel::End => write!(f, "end"),
            WindowLabel::Interior(n) => write!(f, "interior #{n}"),
        }
    }
}

/// Classification of a comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every examined byte matched.
    Match,
    /// A path argument was empty or blank.
    EmptyPath,
    /// One of the files does not exist.
    NotFound,
    /// The files have different lengths.
    LengthMismatch,
    /// A byte differs (full comparison or a single range).
    Mismatch,
    /// The start window matched but the end window did not.
    MismatchAtEnd,
    /// The end window matched but the start window did not.
    MismatchAtStart,
    /// Neither the start nor the end window matched.
    MismatchAtBothEnds,
    /// Start and end matched; an interior window did not.
    MismatchInMiddle,
    /// An I/O error prevented the comparison.
    Error,
}

impl Outcome {
    #[must_use]
    pub fn is_match(self) -> bool {
        self == Outcome::Match
    }

    /// Whether the failure stems from the arguments rather than file content.
    #[must_use]
    pub fn is_input_error(self) -> bool {
        matches!(self, Outcome::EmptyPath | Outcome::NotFound)
    }
}

/// Verdict for a compared range or file pair.
///
/// `detail` is always populated; for non-matching outcomes it names the
/// specific reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub outcome: Outcome,
    pub detail: String,
}

impl Comparison {
    #[must_use]
    pub fn matched(detail: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Match,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn failed(outcome: Outcome, detail: impl Into<String>) -> Self {
        debug_assert!(!outcome.is_match());
        Self {
            outcome,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.outcome.is_match()
    }
}

/// Format a byte count as kilobytes with one decimal and thousands separators,
/// e.g. `1,234.5`.
#[must_use]
pub fn format_kb(bytes: u64) -> String {
    let formatted = format!("{:.1}", bytes as f64 / 1024.0);
    let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, "0"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{grouped}.{fraction}")
}
