//! Wildcard file-match comparisons.
//!
//! Compares every file matching a pattern such as `data/*.raw` with the file
//! of the same name inside a comparison directory. Counts accumulate in a
//! [`Tally`] and the verdict follows the same rules as directory
//! reconciliation.

use std::path::{Path, PathBuf};

use crate::compare::FileComparator;
use crate::reconcile::{Reconciliation, Tally};

/// Errors from expanding a wildcard pattern.
#[derive(thiserror::Error, Debug)]
pub enum PatternError {
    /// The pattern could not be parsed or read.
    #[error("Invalid file match pattern '{pattern}': {message}")]
    Invalid {
        /// The offending pattern
        pattern: String,
        /// Parser or I/O message
        message: String,
    },

    /// No regular files matched.
    #[error("No files match pattern '{0}'")]
    NoMatches(String),

    /// The directory to compare against does not exist.
    #[error("Comparison directory not found: {0}")]
    ComparisonNotFound(PathBuf),
}

/// Check if a string contains wildcard characters.
#[must_use]
pub fn contains_wildcard(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[')
}

/// Expand a wildcard pattern into the matching regular files, sorted.
///
/// # Errors
///
/// Returns an error if the pattern is invalid, a match cannot be read, or
/// nothing matches.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, PatternError> {
    let paths = glob::glob(pattern).map_err(|e| PatternError::Invalid {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| PatternError::Invalid {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(PatternError::NoMatches(pattern.to_string()));
    }

    matches.sort();
    Ok(matches)
}

/// Compare each file matching `pattern` with `compare_dir/<file name>`.
///
/// # Errors
///
/// Returns [`PatternError`] if the comparison directory is missing or the
/// pattern matches nothing.
pub fn compare_matching(
    comparator: &FileComparator,
    pattern: &str,
    compare_dir: &Path,
) -> Result<Reconciliation, PatternError> {
    if !compare_dir.is_dir() {
        return Err(PatternError::ComparisonNotFound(compare_dir.to_path_buf()));
    }

    let files = expand_pattern(pattern)?;
    log::debug!("Pattern '{}' matched {} file(s)", pattern, files.len());

    let mut tally = Tally::default();
    for base_file in &files {
        let Some(name) = base_file.file_name() else {
            continue;
        };
        let counterpart = compare_dir.join(name);

        if !counterpart.is_file() {
            log::warn!(
                "  File {} not found in the comparison directory",
                name.to_string_lossy()
            );
            tally.record_missing();
        } else if comparator.compare_files(base_file, &counterpart).is_match() {
            tally.record_match();
        } else {
            tally.record_mismatch();
        }
    }

    Ok(Reconciliation {
        base: PathBuf::from(pattern),
        comparison: compare_dir.to_path_buf(),
        verdict: tally.verdict(),
        tally,
        skipped: 0,
    })
}
