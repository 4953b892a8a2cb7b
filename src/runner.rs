//! Run dispatch.
//!
//! A [`Runner`] takes the two command-line arguments, decides which kind of
//! comparison they describe, performs it, and returns a [`RunOutcome`] with
//! the verdict, an exit code, and a printable report.
//!
//! | Base argument | Comparison argument | Mode |
//! |---|---|---|
//! | directory | directory | tree reconciliation |
//! | file | directory | `comparison/<base file name>` |
//! | file | file | single pair |
//! | wildcard pattern | directory | every matching file |
//!
//! Dataset runs (`DMS <name>`) go through [`SampledRunner::run_dataset`],
//! which resolves the name first and then reconciles the two directories.

use std::path::Path;

use crate::compare::{Comparison, FileComparator, Outcome};
use crate::error::ExitCode;
use crate::output::{Mode, RunReport};
use crate::reconcile::{DirectoryReconciler, Reconciliation};
use crate::resolver::DatasetPathResolver;
use crate::wildcard::{compare_matching, contains_wildcard};

/// Base argument that requests a dataset lookup.
pub const DATASET_KEYWORD: &str = "DMS";

/// Result of one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub matched: bool,
    pub code: ExitCode,
    pub report: RunReport,
}

/// Runs one comparison described by two arguments.
pub trait Runner {
    /// Compare `comparison` against `base`.
    ///
    /// Never fails outright: every problem is folded into the outcome's exit
    /// code and report detail.
    fn run(&mut self, base: &str, comparison: &str) -> RunOutcome;
}

/// Whether the arguments ask for a dataset lookup rather than a path comparison.
///
/// True when `base` is `DMS` (any case) and `comparison` has no path separator.
#[must_use]
pub fn is_dataset_request(base: &str, comparison: &str) -> bool {
    base.eq_ignore_ascii_case(DATASET_KEYWORD) && !comparison.contains(['/', '\\'])
}

/// [`Runner`] backed by a [`FileComparator`].
#[derive(Debug)]
pub struct SampledRunner {
    comparator: FileComparator,
    parameters_logged: bool,
}

impl SampledRunner {
    #[must_use]
    pub fn new(comparator: FileComparator) -> Self {
        Self {
            comparator,
            parameters_logged: false,
        }
    }

    /// Resolve `dataset` and reconcile its storage directory against its
    /// archive directory.
    ///
    /// A failed lookup ends the run with [`ExitCode::LookupFailed`] before any
    /// file is touched.
    pub fn run_dataset(&mut self, resolver: &dyn DatasetPathResolver, dataset: &str) -> RunOutcome {
        self.log_parameters();

        match resolver.resolve(dataset) {
            Ok(paths) => {
                log::info!("Dataset {}", dataset);
                self.run_directories(&paths.storage_path, &paths.archive_path, Mode::Dataset)
            }
            Err(e) => self.lookup_failed(dataset, &e),
        }
    }

    /// Outcome for a dataset whose lookup could not even be attempted or failed.
    pub fn lookup_failed(&self, dataset: &str, error: &dyn std::fmt::Display) -> RunOutcome {
        log::error!("{}", error);
        self.finish(RunReport::new(
            Mode::Dataset,
            DATASET_KEYWORD,
            dataset,
            self.comparator.settings(),
            ExitCode::LookupFailed,
            error.to_string(),
        ))
    }

    fn log_parameters(&mut self) {
        if self.parameters_logged {
            return;
        }
        let settings = self.comparator.settings();
        log::info!("Number of samples: {}", settings.sample_count());
        log::info!("Sample size:       {}", settings.sample_size_display());
        self.parameters_logged = true;
    }

    fn run_files(&self, base: &Path, comparison: &Path) -> RunOutcome {
        let result = self.comparator.compare_files(base, comparison);
        let code = exit_code_for(&result);
        self.finish(
            RunReport::new(
                Mode::Files,
                base.display().to_string(),
                comparison.display().to_string(),
                self.comparator.settings(),
                code,
                result.detail,
            )
            .with_outcome(result.outcome),
        )
    }

    fn run_directories(&self, base: &Path, comparison: &Path, mode: Mode) -> RunOutcome {
        let reconciler = DirectoryReconciler::new(&self.comparator);
        match reconciler.reconcile(base, comparison) {
            Ok(reconciliation) => self.finish_reconciliation(mode, &reconciliation),
            Err(e) => self.invalid(mode, base, comparison, e.to_string()),
        }
    }

    fn run_wildcard(&self, pattern: &str, comparison: &Path) -> RunOutcome {
        match compare_matching(&self.comparator, pattern, comparison) {
            Ok(reconciliation) => self.finish_reconciliation(Mode::Wildcard, &reconciliation),
            Err(e) => self.invalid(Mode::Wildcard, Path::new(pattern), comparison, e.to_string()),
        }
    }

    fn finish_reconciliation(&self, mode: Mode, reconciliation: &Reconciliation) -> RunOutcome {
        let code = if reconciliation.is_match() {
            ExitCode::Success
        } else {
            ExitCode::Mismatch
        };
        self.finish(
            RunReport::new(
                mode,
                reconciliation.base.display().to_string(),
                reconciliation.comparison.display().to_string(),
                self.comparator.settings(),
                code,
                reconciliation.summary(),
            )
            .with_tally(reconciliation.tally),
        )
    }

    fn invalid(&self, mode: Mode, base: &Path, comparison: &Path, detail: String) -> RunOutcome {
        log::error!("{}", detail);
        self.finish(RunReport::new(
            mode,
            base.display().to_string(),
            comparison.display().to_string(),
            self.comparator.settings(),
            ExitCode::InvalidInput,
            detail,
        ))
    }

    fn finish(&self, report: RunReport) -> RunOutcome {
        RunOutcome {
            matched: report.matched,
            code: report.code,
            report,
        }
    }
}

impl Runner for SampledRunner {
    fn run(&mut self, base: &str, comparison: &str) -> RunOutcome {
        self.log_parameters();

        let base_path = Path::new(base);
        let comparison_path = Path::new(comparison);

        if base.trim().is_empty() {
            return self.invalid(
                Mode::Invalid,
                base_path,
                comparison_path,
                "Base input path is empty".into(),
            );
        }
        if comparison.trim().is_empty() {
            return self.invalid(
                Mode::Invalid,
                base_path,
                comparison_path,
                "Comparison path is empty".into(),
            );
        }

        if base_path.is_dir() {
            return self.run_directories(base_path, comparison_path, Mode::Directories);
        }

        if base_path.is_file() {
            if comparison_path.is_dir() {
                let Some(name) = base_path.file_name() else {
                    return self.invalid(
                        Mode::Files,
                        base_path,
                        comparison_path,
                        format!("Cannot determine the file name of {}", base),
                    );
                };
                return self.run_files(base_path, &comparison_path.join(name));
            }
            return self.run_files(base_path, comparison_path);
        }

        if contains_wildcard(base) {
            return self.run_wildcard(base, comparison_path);
        }

        self.invalid(
            Mode::Invalid,
            base_path,
            comparison_path,
            format!("Base file or directory not found: {}", base),
        )
    }
}

/// Map a single-pair verdict to an exit code.
#[must_use]
pub fn exit_code_for(result: &Comparison) -> ExitCode {
    match result.outcome {
        Outcome::Match => ExitCode::Success,
        Outcome::Error => ExitCode::GeneralError,
        outcome if outcome.is_input_error() => ExitCode::InvalidInput,
        _ => ExitCode::Mismatch,
    }
}
