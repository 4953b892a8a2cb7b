//! Chunked byte-range comparison of two open streams.
//!
//! # Overview
//!
//! [`RangeComparator`] reads the same range from two streams in fixed-size
//! chunks (50 MB by default), so memory use is bounded regardless of the
//! window size. The first differing byte ends the comparison and is reported
//! by its file-relative offset.
//!
//! I/O errors never escape: they are converted into a not-matched
//! [`Comparison`] with [`Outcome::Error`].

use std::io::{self, Read, Seek, SeekFrom};
use std::time::{Duration, Instant};

use super::{Comparison, Outcome, SampleWindow};
use crate::progress::ProgressSink;

/// Bytes read from each stream per iteration (50 MB).
pub const CHUNK_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// Minimum time between progress notifications.
pub const STATUS_INTERVAL: Duration = Duration::from_secs(2);

/// Range of the streams to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// Everything from position 0 to end of file.
    Whole,
    /// A single window.
    Window(SampleWindow),
}

/// Rate limiter for progress notifications.
///
/// Shared by reference across all windows of one file pair so the interval
/// holds across window boundaries.
#[derive(Debug, Clone)]
pub struct StatusThrottle {
    last: Instant,
    interval: Duration,
}

impl StatusThrottle {
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(STATUS_INTERVAL)
    }

    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            last: Instant::now(),
            interval,
        }
    }

    /// Returns true (and restarts the interval) once the interval has elapsed.
    pub fn ready(&mut self) -> bool {
        if self.last.elapsed() >= self.interval {
            self.last = Instant::now();
            true
        } else {
            false
        }
    }
}

impl Default for StatusThrottle {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares a byte range of two streams.
pub struct RangeComparator<'a> {
    progress: &'a dyn ProgressSink,
    chunk_size: usize,
}

impl<'a> RangeComparator<'a> {
    /// Create a comparator that reports progress to `progress`.
    #[must_use]
    pub fn new(progress: &'a dyn ProgressSink) -> Self {
        Self {
            progress,
            chunk_size: CHUNK_SIZE_BYTES,
        }
    }

    /// Override the chunk size (minimum 1 byte).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Compare `span` of `base` and `other`.
    ///
    /// Returns `"Files match"` when the range is identical, or
    /// `"Mismatch at offset N"` with the absolute offset of the first
    /// difference. Read failures become an [`Outcome::Error`] result.
    ///
    /// # Example
    ///
    /// ```
    /// use samplecmp::compare::{RangeComparator, SampleWindow, Span, StatusThrottle};
    /// use samplecmp::progress::NoProgress;
    /// use std::io::Cursor;
    ///
    /// let mut a = Cursor::new(b"abcdefgh".to_vec());
    /// let mut b = Cursor::new(b"abcdXfgh".to_vec());
    ///
    /// let comparator = RangeComparator::new(&NoProgress);
    /// let mut throttle = StatusThrottle::new();
    /// let result = comparator.compare(
    ///     &mut a,
    ///     &mut b,
    ///     Span::Window(SampleWindow::new(2, 4)),
    ///     "Sample 1 of 1",
    ///     &mut throttle,
    /// );
    /// assert_eq!(result.detail, "Mismatch at offset 4");
    /// ```
    pub fn compare<B, C>(
        &self,
        base: &mut B,
        other: &mut C,
        span: Span,
        description: &str,
        throttle: &mut StatusThrottle,
    ) -> Comparison
    where
        B: Read + Seek,
        C: Read + Seek,
    {
        match self.try_compare(base, other, span, description, throttle) {
            Ok(result) => result,
            Err(e) => {
                log::error!("Error comparing {}: {}", description, e);
                Comparison::failed(Outcome::Error, format!("Error comparing {description}: {e}"))
            }
        }
    }

    fn try_compare<B, C>(
        &self,
        base: &mut B,
        other: &mut C,
        span: Span,
        description: &str,
        throttle: &mut StatusThrottle,
    ) -> io::Result<Comparison>
    where
        B: Read + Seek,
        C: Read + Seek,
    {
        let base_len = base.seek(SeekFrom::End(0))?;
        let other_len = other.seek(SeekFrom::End(0))?;

        let (start, end) = match span {
            Span::Whole => (0, base_len),
            Span::Window(window) => {
                if window.offset > base_len {
                    return Ok(Comparison::failed(
                        Outcome::Mismatch,
                        "StartOffset is beyond the end of the base file",
                    ));
                }
                if window.offset > other_len {
                    return Ok(Comparison::failed(
                        Outcome::Mismatch,
                        "StartOffset is beyond the end of the comparison file",
                    ));
                }
                (window.offset, window.end().min(base_len))
            }
        };

        base.seek(SeekFrom::Start(start))?;
        other.seek(SeekFrom::Start(start))?;

        let buffer_len = usize::try_from(end - start)
            .map_or(self.chunk_size, |len| len.min(self.chunk_size));
        let mut base_buf = vec![0u8; buffer_len];
        let mut other_buf = vec![0u8; buffer_len];

        let mut position = start;
        while position < end {
            let want = usize::try_from(end - position).map_or(buffer_len, |n| n.min(buffer_len));

            let base_read = read_full(base, &mut base_buf[..want])?;
            if base_read == 0 {
                // Base shrank while being read.
                break;
            }
            let other_read = read_full(other, &mut other_buf[..base_read])?;

            if let Some(index) = first_difference(&base_buf[..other_read], &other_buf[..other_read]) {
                return Ok(mismatch_at(position + index as u64));
            }
            if other_read < base_read {
                return Ok(mismatch_at(position + other_read as u64));
            }

            position += base_read as u64;

            if throttle.ready() {
                let percent = (position - start) as f64 / (end - start) as f64 * 100.0;
                self.progress.on_window_progress(description, percent);
            }
        }

        Ok(Comparison::matched("Files match"))
    }
}

fn mismatch_at(offset: u64) -> Comparison {
    Comparison::failed(Outcome::Mismatch, format!("Mismatch at offset {offset}"))
}

fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter().zip(b).position(|(x, y)| x != y)
}

/// Fill `buf` as far as the stream allows, returning the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
