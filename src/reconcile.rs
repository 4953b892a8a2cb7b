//! Directory tree reconciliation.
//!
//! # Overview
//!
//! [`DirectoryReconciler`] walks a base directory depth-first, maps every file
//! to the path it should have under the comparison directory, and compares
//! each pair with a [`FileComparator`]. Outcomes accumulate in a [`Tally`],
//! which decides the final [`ReconcileVerdict`].
//!
//! A file whose counterpart is missing is counted and the walk continues.
//! Symbolic links are followed. Entries the walker cannot place (unreadable
//! directories, broken links, sockets and other special files) are logged
//! and counted in [`Reconciliation::skipped`] instead of the tally.
//!
//! # Example
//!
//! ```no_run
//! use samplecmp::compare::{CompareSettings, FileComparator};
//! use samplecmp::reconcile::DirectoryReconciler;
//! use std::path::Path;
//!
//! let comparator = FileComparator::new(CompareSettings::default());
//! let reconciler = DirectoryReconciler::new(&comparator);
//! let result = reconciler.reconcile(Path::new("/data/run42"), Path::new("/archive/run42")).unwrap();
//! println!("{}", result.summary());
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::compare::FileComparator;

/// Running counts for one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Base files examined (matched + missing + mismatched)
    pub total_source_files: usize,
    /// Files whose counterpart matched
    pub matched: usize,
    /// Files with no counterpart in the comparison tree
    pub missing: usize,
    /// Files whose counterpart did not match
    pub mismatched: usize,
}

impl Tally {
    pub fn record_match(&mut self) {
        self.matched += 1;
        self.total_source_files += 1;
    }

    pub fn record_missing(&mut self) {
        self.missing += 1;
        self.total_source_files += 1;
    }

    pub fn record_mismatch(&mut self) {
        self.mismatched += 1;
        self.total_source_files += 1;
    }

    /// Derive the overall verdict.
    ///
    /// An empty base counts as a match. Missing files take precedence over
    /// mismatches.
    #[must_use]
    pub fn verdict(&self) -> ReconcileVerdict {
        if self.total_source_files == 0 {
            ReconcileVerdict::NothingToCompare
        } else if self.missing > 0 {
            ReconcileVerdict::MissingFiles
        } else if self.mismatched > 0 {
            ReconcileVerdict::Mismatched
        } else {
            ReconcileVerdict::Match
        }
    }
}

/// Tree-level verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileVerdict {
    /// The base tree held no files. Treated as a match.
    NothingToCompare,
    Match,
    Mismatched,
    MissingFiles,
}

impl ReconcileVerdict {
    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(self, Self::NothingToCompare | Self::Match)
    }
}

/// Result of reconciling two trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub base: PathBuf,
    pub comparison: PathBuf,
    pub tally: Tally,
    pub verdict: ReconcileVerdict,
    /// Entries skipped because they could not be placed in the tree
    pub skipped: usize,
}

impl Reconciliation {
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.verdict.is_match()
    }

    /// Human-readable summary of the verdict.
    #[must_use]
    pub fn summary(&self) -> String {
        let tally = &self.tally;
        match self.verdict {
            ReconcileVerdict::NothingToCompare => format!(
                "Base directory was empty; nothing to compare: {}",
                self.base.display()
            ),
            ReconcileVerdict::Match => format!(
                "Directories match; checked {} file(s)",
                tally.total_source_files
            ),
            ReconcileVerdict::Mismatched => format!(
                "Directories do not match; Mis-matched file count: {}; Matched file count: {}",
                tally.mismatched, tally.matched
            ),
            ReconcileVerdict::MissingFiles => format!(
                "Comparison directory is missing {} file(s) that the base directory contains; \
                 Mis-matched file count: {}; Matched file count: {}",
                tally.missing, tally.mismatched, tally.matched
            ),
        }
    }
}

/// Errors that stop a reconciliation before the walk begins.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// The base directory does not exist.
    #[error("Base directory to compare not found: {0}")]
    BaseNotFound(PathBuf),

    /// The comparison directory does not exist.
    #[error("Comparison directory not found: {0}")]
    ComparisonNotFound(PathBuf),
}

/// Matches a base directory tree against a comparison tree.
pub struct DirectoryReconciler<'a> {
    comparator: &'a FileComparator,
}

impl<'a> DirectoryReconciler<'a> {
    #[must_use]
    pub fn new(comparator: &'a FileComparator) -> Self {
        Self { comparator }
    }

    /// Reconcile using the comparator's own sample settings.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] if either directory does not exist.
    pub fn reconcile(&self, base_dir: &Path, compare_dir: &Path) -> Result<Reconciliation, ReconcileError> {
        let settings = self.comparator.settings();
        self.reconcile_with(
            base_dir,
            compare_dir,
            settings.sample_count(),
            settings.sample_size_bytes(),
        )
    }

    /// Reconcile with explicit sample parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] if either directory does not exist.
    pub fn reconcile_with(
        &self,
        base_dir: &Path,
        compare_dir: &Path,
        sample_count: usize,
        sample_size_bytes: u64,
    ) -> Result<Reconciliation, ReconcileError> {
        let base_root = trim_trailing_separators(base_dir);
        let compare_root = trim_trailing_separators(compare_dir);

        if !base_root.is_dir() {
            return Err(ReconcileError::BaseNotFound(base_root));
        }
        if !compare_root.is_dir() {
            return Err(ReconcileError::ComparisonNotFound(compare_root));
        }

        log::info!("Comparing directories:");
        log::info!("    {}", base_root.display());
        log::info!("vs. {}", compare_root.display());

        let mut tally = Tally::default();
        let mut skipped = 0;

        // Links are followed so linked files and directories are compared like
        // their targets. Broken links and link cycles surface as walk errors.
        for entry in WalkDir::new(&base_root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            if !entry.file_type().is_file() {
                log::warn!("Skipping special file: {}", entry.path().display());
                skipped += 1;
                continue;
            }

            let base_file = entry.path();
            let Some(counterpart) = counterpart_path(&base_root, &compare_root, base_file) else {
                log::warn!(
                    "Cannot determine the parent directory path; skipping {}",
                    base_file.display()
                );
                skipped += 1;
                continue;
            };

            if !counterpart.is_file() {
                log::warn!(
                    "  File {} not found in the comparison directory",
                    entry.file_name().to_string_lossy()
                );
                tally.record_missing();
                continue;
            }

            let result = self
                .comparator
                .compare(base_file, &counterpart, sample_count, sample_size_bytes, true);
            if result.is_match() {
                tally.record_match();
            } else {
                tally.record_mismatch();
            }
        }

        let reconciliation = Reconciliation {
            base: base_root,
            comparison: compare_root,
            verdict: tally.verdict(),
            tally,
            skipped,
        };

        match reconciliation.verdict {
            ReconcileVerdict::Match => log::info!("{}", reconciliation.summary()),
            _ => log::warn!("{}", reconciliation.summary()),
        }

        Ok(reconciliation)
    }
}

/// Expected location of `base_file` under `compare_root`.
///
/// Files directly in the base root map to `compare_root/<name>`; nested files
/// keep their relative subdirectory. Returns `None` when the file has no
/// parent or lies outside `base_root`.
#[must_use]
pub fn counterpart_path(base_root: &Path, compare_root: &Path, base_file: &Path) -> Option<PathBuf> {
    let parent = base_file.parent()?;
    let name = base_file.file_name()?;

    if parent == base_root {
        return Some(compare_root.join(name));
    }

    let relative = parent.strip_prefix(base_root).ok()?;
    Some(compare_root.join(relative).join(name))
}

/// Drop trailing path separators, e.g. `data/run/` becomes `data/run`.
#[must_use]
pub fn trim_trailing_separators(path: &Path) -> PathBuf {
    path.components().collect()
}
