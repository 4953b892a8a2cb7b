//! Progress reporting utilities using indicatif.
//!
//! Comparisons notify a [`ProgressSink`] as they run. The sink is a passive
//! observer: nothing it does can change a comparison result.
//!
//! - [`TerminalProgress`] draws a per-file progress bar for interactive use
//! - [`NoProgress`] discards every notification

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Observer for long-running comparisons.
///
/// Implement this trait to receive progress updates while file pairs are
/// being compared.
pub trait ProgressSink: Send + Sync {
    /// Called before a file pair is compared.
    ///
    /// # Arguments
    ///
    /// * `label` - Display name of the pair (usually the base file path)
    /// * `file_len` - Length of the base file in bytes
    fn on_pair_start(&self, label: &str, file_len: u64);

    /// Called periodically while a window is being read.
    ///
    /// Throttled by the caller to roughly once every two seconds.
    ///
    /// # Arguments
    ///
    /// * `description` - Window being compared (e.g., "Sample 3 of 10")
    /// * `percent` - Percentage of the current window processed
    fn on_window_progress(&self, description: &str, percent: f64);

    /// Called when a file pair has been compared.
    fn on_pair_end(&self, _matched: bool) {}
}

/// Sink that ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_pair_start(&self, _label: &str, _file_len: u64) {}

    fn on_window_progress(&self, _description: &str, _percent: f64) {}
}

/// Progress reporter using indicatif.
///
/// Only one bar exists at a time; comparisons are sequential.
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
    label: Mutex<String>,
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalProgress {
    /// Create a new progress reporter.
    ///
    /// Callers decide whether output is interactive; this type always draws.
    ///
    /// # Examples
    ///
    /// ```
    /// use samplecmp::progress::TerminalProgress;
    ///
    /// let progress = TerminalProgress::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            label: Mutex::new(String::new()),
        }
    }

    fn window_style() -> ProgressStyle {
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }
}

impl ProgressSink for TerminalProgress {
    fn on_pair_start(&self, label: &str, _file_len: u64) {
        if let Ok(mut current) = self.label.lock() {
            *current = truncate_path(label, 30);
        }

        // The bar is created lazily on the first throttled update so that
        // quick comparisons never draw anything.
        if let Ok(mut bar) = self.bar.lock() {
            if let Some(old) = bar.take() {
                old.finish_and_clear();
            }
        }
    }

    fn on_window_progress(&self, description: &str, percent: f64) {
        let label = self.label.lock().map(|l| l.clone()).unwrap_or_default();
        let message = if label.is_empty() {
            description.to_string()
        } else {
            format!("{label}: {description}")
        };

        if let Ok(mut bar) = self.bar.lock() {
            let pb = bar.get_or_insert_with(|| {
                let pb = ProgressBar::new(100);
                pb.set_style(Self::window_style());
                pb
            });
            pb.set_position(percent.clamp(0.0, 100.0) as u64);
            pb.set_message(message);
        }
    }

    fn on_pair_end(&self, _matched: bool) {
        if let Ok(mut bar) = self.bar.lock() {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let path_buf = std::path::Path::new(path);
    let file_name = path_buf
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.len() >= max_len {
        let mut cut = file_name.len() - max_len + 3;
        while !file_name.is_char_boundary(cut) {
            cut += 1;
        }
        return format!("...{}", &file_name[cut..]);
    }

    format!(".../{}", file_name)
}
