//! File pair comparison with full or sampled strategy.
//!
//! # Overview
//!
//! [`FileComparator`] validates the two paths, checks that the lengths agree,
//! and then either reads both files completely or examines only the sample
//! windows chosen by [`SampleSelector`]:
//!
//! 1. **Start and end** windows are compared first. A mismatch in exactly one
//!    of them is reported immediately with that window's detail.
//! 2. **Interior** windows are compared left to right, stopping at the first
//!    mismatch.
//! 3. When everything matches, the detail reports the share of the file that
//!    was actually examined.
//!
//! If both the start and end windows differ, the earliest-offset mismatch
//! (the start window) is reported and interior windows are skipped.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::range::{RangeComparator, Span, StatusThrottle, STATUS_INTERVAL};
use super::sampler::{percent_examined, SampleSelector};
use super::{format_kb, CompareSettings, Comparison, Outcome, SampleWindow, WindowLabel};
use crate::progress::{NoProgress, ProgressSink};

/// Compares file pairs.
///
/// Each call opens its own file handles and closes them on every exit path,
/// so a comparator can be reused for any number of pairs.
///
/// # Example
///
/// ```no_run
/// use samplecmp::compare::{CompareSettings, FileComparator};
/// use std::path::Path;
///
/// let comparator = FileComparator::new(CompareSettings::new(4, 1024));
/// let result = comparator.compare_files(Path::new("run1.raw"), Path::new("archive/run1.raw"));
/// if !result.is_match() {
///     eprintln!("{}", result.detail);
/// }
/// ```
pub struct FileComparator {
    settings: CompareSettings,
    progress: Arc<dyn ProgressSink>,
    chunk_size: usize,
    status_interval: Duration,
}

impl std::fmt::Debug for FileComparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileComparator")
            .field("settings", &self.settings)
            .field("progress", &"<sink>")
            .field("chunk_size", &self.chunk_size)
            .field("status_interval", &self.status_interval)
            .finish()
    }
}

impl FileComparator {
    /// Create a comparator with the given settings and no progress output.
    #[must_use]
    pub fn new(settings: CompareSettings) -> Self {
        Self {
            settings,
            progress: Arc::new(NoProgress),
            chunk_size: super::range::CHUNK_SIZE_BYTES,
            status_interval: STATUS_INTERVAL,
        }
    }

    /// Set the progress sink.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Override the read chunk size (mainly useful for tests).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Override the minimum time between progress notifications.
    #[must_use]
    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }

    #[must_use]
    pub fn settings(&self) -> CompareSettings {
        self.settings
    }

    /// Compare two files using the comparator's own settings, reporting matches.
    pub fn compare_files(&self, base: &Path, other: &Path) -> Comparison {
        self.compare(
            base,
            other,
            self.settings.sample_count(),
            self.settings.sample_size_bytes(),
            true,
        )
    }

    /// Compare two files.
    ///
    /// `sample_count` and `sample_size_bytes` are clamped like
    /// [`CompareSettings::new`]. Mismatches are always logged as warnings;
    /// matches are logged only when `report_on_match` is set. The returned
    /// [`Comparison`] always carries a detail.
    pub fn compare(
        &self,
        base: &Path,
        other: &Path,
        sample_count: usize,
        sample_size_bytes: u64,
        report_on_match: bool,
    ) -> Comparison {
        let settings = CompareSettings::new(sample_count, sample_size_bytes);

        let result = self.compare_inner(base, other, settings);

        let pair = format!("{}  vs. {}", base.display(), other.display());
        if !result.is_match() {
            log::warn!("{}: {}", result.detail, pair);
        } else if report_on_match {
            log::info!("{}: {}", result.detail, pair);
        }

        result
    }

    fn compare_inner(&self, base: &Path, other: &Path, settings: CompareSettings) -> Comparison {
        if is_blank(base) {
            return Comparison::failed(Outcome::EmptyPath, "Base input file path is empty");
        }
        if is_blank(other) {
            return Comparison::failed(Outcome::EmptyPath, "Input file path to compare is empty");
        }

        log::debug!(
            "Comparing {}",
            base.file_name().unwrap_or(base.as_os_str()).to_string_lossy()
        );

        let file_len = match lengths_match(base, other) {
            Ok(len) => len,
            Err(result) => return result,
        };

        self.progress
            .on_pair_start(&base.display().to_string(), file_len);

        let selector = SampleSelector::new(settings);
        let result = if selector.prefers_full_comparison(file_len) {
            self.compare_complete(base, other)
        } else {
            self.compare_sampled(base, other, file_len, &selector, settings.sample_count())
        };

        self.progress.on_pair_end(result.is_match());
        result
    }

    /// Byte-by-byte comparison of the entire files.
    fn compare_complete(&self, base: &Path, other: &Path) -> Comparison {
        let (mut base_file, mut other_file) = match open_pair(base, other) {
            Ok(files) => files,
            Err(result) => return result,
        };

        let mut throttle = StatusThrottle::with_interval(self.status_interval);
        self.range_comparator().compare(
            &mut base_file,
            &mut other_file,
            Span::Whole,
            "Full comparison",
            &mut throttle,
        )
    }

    /// Compare the sample windows, stopping as soon as the verdict is known.
    fn compare_sampled(
        &self,
        base: &Path,
        other: &Path,
        file_len: u64,
        selector: &SampleSelector,
        sample_count: usize,
    ) -> Comparison {
        let (mut base_file, mut other_file) = match open_pair(base, other) {
            Ok(files) => files,
            Err(result) => return result,
        };

        let windows = selector.windows(file_len);
        let ranges = self.range_comparator();
        let mut throttle = StatusThrottle::with_interval(self.status_interval);
        let mut evaluated: Vec<(WindowLabel, SampleWindow, Comparison)> = Vec::with_capacity(windows.len());

        for (index, window) in windows.iter().enumerate() {
            let description = format!("Sample {} of {}", index + 1, sample_count);
            let result = ranges.compare(
                &mut base_file,
                &mut other_file,
                Span::Window(*window),
                &description,
                &mut throttle,
            );
            let failed = !result.is_match();
            evaluated.push((WindowLabel::for_index(index), *window, result));

            // Start and end are judged together; interior windows one at a time.
            let verdict_known = match index {
                0 => false,
                1 => evaluated.iter().any(|(_, _, r)| !r.is_match()),
                _ => failed,
            };
            if verdict_known {
                break;
            }
        }

        summarize_samples(&evaluated, file_len)
    }

    fn range_comparator(&self) -> RangeComparator<'_> {
        RangeComparator::new(self.progress.as_ref()).with_chunk_size(self.chunk_size)
    }
}

/// Turn the evaluated windows, in evaluation order, into one verdict.
fn summarize_samples(evaluated: &[(WindowLabel, SampleWindow, Comparison)], file_len: u64) -> Comparison {
    if let Some((_, _, error)) = evaluated.iter().find(|(_, _, r)| r.outcome == Outcome::Error) {
        return error.clone();
    }

    let result_for = |label: WindowLabel| {
        evaluated
            .iter()
            .find(|(l, _, _)| *l == label)
            .map(|(_, _, r)| r)
    };

    let start = result_for(WindowLabel::Start);
    let end = result_for(WindowLabel::End);

    match (start, end) {
        (Some(start), Some(end)) if start.is_match() && !end.is_match() => {
            return Comparison::failed(
                Outcome::MismatchAtEnd,
                format!("Files match at the beginning but not at the end; {}", end.detail),
            );
        }
        (Some(start), Some(end)) if !start.is_match() && end.is_match() => {
            return Comparison::failed(
                Outcome::MismatchAtStart,
                format!("Files match at the end but not at the beginning; {}", start.detail),
            );
        }
        (Some(start), Some(end)) if !start.is_match() && !end.is_match() => {
            return Comparison::failed(
                Outcome::MismatchAtBothEnds,
                format!("Files match at neither the beginning nor the end; {}", start.detail),
            );
        }
        _ => {}
    }

    if let Some((_, _, middle)) = evaluated
        .iter()
        .find(|(l, _, r)| matches!(l, WindowLabel::Interior(_)) && !r.is_match())
    {
        return Comparison::failed(
            Outcome::MismatchInMiddle,
            format!("Files match at the beginning and end, but not in the middle; {}", middle.detail),
        );
    }

    let windows: Vec<SampleWindow> = evaluated.iter().map(|(_, w, _)| *w).collect();
    let percent = percent_examined(&windows, file_len);
    Comparison::matched(format!("Files match (examined {percent:.2}% of the file)"))
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// Check that both files exist and have the same length.
///
/// Returns the shared length, or the failed comparison to report.
fn lengths_match(base: &Path, other: &Path) -> Result<u64, Comparison> {
    let base_len = file_length(base, "Base file to compare not found")?;
    let other_len = file_length(other, "Comparison file not found")?;

    if base_len != other_len {
        return Err(Comparison::failed(
            Outcome::LengthMismatch,
            format!(
                "Base file is {} KB; comparison file is {} KB",
                format_kb(base_len),
                format_kb(other_len)
            ),
        ));
    }

    Ok(base_len)
}

fn file_length(path: &Path, not_found: &str) -> Result<u64, Comparison> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Err(Comparison::failed(
            Outcome::NotFound,
            format!("{}: {}", not_found, path.display()),
        )),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Comparison::failed(
            Outcome::NotFound,
            format!("{}: {}", not_found, path.display()),
        )),
        Err(e) => Err(Comparison::failed(
            Outcome::Error,
            format!("Error reading {}: {}", path.display(), e),
        )),
    }
}

fn open_pair(base: &Path, other: &Path) -> Result<(File, File), Comparison> {
    let open = |path: &Path| {
        File::open(path).map_err(|e| {
            Comparison::failed(
                Outcome::Error,
                format!("Error opening {}: {}", path.display(), e),
            )
        })
    };
    Ok((open(base)?, open(other)?))
}
