//! Sample window selection.
//!
//! Windows are produced in a fixed order: the start of the file, the end of
//! the file, then interior windows from left to right. Interior windows are
//! centered on the boundaries of `sample_count - 1` equal segments, so they
//! spread across the file instead of clustering at segment edges.
//!
//! # Example
//!
//! ```
//! use samplecmp::compare::{CompareSettings, SampleSelector, SampleWindow};
//!
//! let selector = SampleSelector::new(CompareSettings::new(4, 100));
//! let windows = selector.windows(1000);
//!
//! assert_eq!(windows[0], SampleWindow::new(0, 100));
//! assert_eq!(windows[1], SampleWindow::new(900, 100));
//! assert_eq!(windows.len(), 4);
//! ```

use super::{CompareSettings, SampleWindow};

/// Computes the ordered set of windows to examine for a file length.
#[derive(Debug, Clone, Copy)]
pub struct SampleSelector {
    settings: CompareSettings,
}

impl SampleSelector {
    #[must_use]
    pub fn new(settings: CompareSettings) -> Self {
        Self { settings }
    }

    /// Whether a full sequential comparison should replace sampling.
    ///
    /// When `sample_count * sample_size` reaches the file length, the samples
    /// would cover (nearly) the whole file anyway.
    #[must_use]
    pub fn prefers_full_comparison(&self, file_len: u64) -> bool {
        let sampled = (self.settings.sample_count() as u64).saturating_mul(self.settings.sample_size_bytes());
        sampled >= file_len
    }

    /// Produce the windows for a file of `file_len` bytes.
    ///
    /// Returns an empty list for an empty file. Otherwise the first window is
    /// the start and the second is the end; both shrink to fit short files.
    #[must_use]
    pub fn windows(&self, file_len: u64) -> Vec<SampleWindow> {
        if file_len == 0 {
            return Vec::new();
        }

        let size = self.settings.sample_size_bytes();
        let count = self.settings.sample_count();
        let mut windows = Vec::with_capacity(count);

        windows.push(SampleWindow::new(0, size.min(file_len)));

        // The end window keeps ending at file_len even when it has to shrink.
        let end_offset = file_len.saturating_sub(size);
        windows.push(SampleWindow::new(end_offset, file_len - end_offset));

        if count > 2 && file_len > size.saturating_mul(2) {
            let interior_count = count - 2;
            let segment_len = file_len as f64 / (interior_count + 1) as f64;
            let half_window = size as f64 / 2.0;

            for k in 1..=interior_count {
                let raw_offset = (segment_len * k as f64 - half_window).round_ties_even();
                if raw_offset >= file_len as f64 {
                    break;
                }

                let offset = raw_offset.max(0.0) as u64;
                windows.push(SampleWindow::new(offset, size.min(file_len - offset)));
            }
        }

        windows
    }
}

/// Percentage of the file covered by `windows`, capped at 100 and computed
/// from the window lengths actually counted.
#[must_use]
pub fn percent_examined(windows: &[SampleWindow], file_len: u64) -> f64 {
    if file_len == 0 {
        return 100.0;
    }

    let examined: u64 = windows.iter().map(|w| w.length).sum();
    (examined as f64 / file_len as f64 * 100.0).min(100.0)
}
