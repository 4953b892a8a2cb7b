//! samplecmp - Sampled File and Directory Comparison
//!
//! Decides whether two large files, or two directory trees, are byte-identical
//! without reading every byte. The start, the end, and evenly spaced interior
//! windows of each file are compared; files small enough that sampling would
//! cover most of them anyway are compared in full.

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod reconcile;
pub mod resolver;
pub mod runner;
pub mod wildcard;

use std::io::IsTerminal;
use std::sync::Arc;

use crate::cli::{Cli, OutputFormat};
use crate::compare::FileComparator;
use crate::config::Config;
use crate::error::ExitCode;
use crate::progress::{NoProgress, ProgressSink, TerminalProgress};
use crate::resolver::SqliteDatasetResolver;
use crate::runner::{is_dataset_request, Runner, SampledRunner};

/// Run one invocation described by parsed command-line arguments.
///
/// Logging must already be initialised. The report is printed to stdout and
/// the exit code for the process is returned.
///
/// # Errors
///
/// Returns an error only if the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref());
    config.apply_cli(&cli);
    let settings = config.compare_settings();
    log::debug!(
        "Effective configuration at {} level: {:?}",
        logging::current_level_name(),
        config
    );

    let interactive = !cli.quiet && cli.output == OutputFormat::Text && std::io::stderr().is_terminal();
    let progress: Arc<dyn ProgressSink> = if interactive {
        Arc::new(TerminalProgress::new())
    } else {
        Arc::new(NoProgress)
    };

    let comparator = FileComparator::new(settings).with_progress(progress);
    let mut runner = SampledRunner::new(comparator);

    let outcome = if is_dataset_request(&cli.base, &cli.comparison) {
        match SqliteDatasetResolver::open_configured(config.dataset_db.as_deref()) {
            Ok(resolver) => runner.run_dataset(&resolver, &cli.comparison),
            Err(e) => runner.lookup_failed(&cli.comparison, &e),
        }
    } else {
        runner.run(&cli.base, &cli.comparison)
    };

    let color = !cli.no_color && std::io::stdout().is_terminal();
    output::print_report(&outcome.report, cli.output, color)?;

    Ok(outcome.code)
}
