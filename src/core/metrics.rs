//! Logger metrics for observability
//!
//! Counters for records written and records lost, shared by a logger and
//! everything derived from it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use field_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.total_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records fully written to their sink
    total_written: AtomicU64,

    /// Records a sink rejected with an I/O or appender error
    write_failures: AtomicU64,

    /// Records rejected because the logger was already flushed
    writes_after_stop: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            writes_after_stop: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_written(&self) -> u64 {
        self.total_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes_after_stop(&self) -> u64 {
        self.writes_after_stop.load(Ordering::Relaxed)
    }

    /// Record a successful write, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.total_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_after_stop(&self) -> u64 {
        self.writes_after_stop.fetch_add(1, Ordering::Relaxed)
    }

    /// Records lost for any reason
    pub fn total_lost(&self) -> u64 {
        self.write_failures() + self.writes_after_stop()
    }

    /// Share of records lost, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been emitted yet.
    pub fn loss_rate(&self) -> f64 {
        let lost = self.total_lost() as f64;
        let total = self.total_written() as f64 + lost;
        if total == 0.0 {
            0.0
        } else {
            (lost / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.total_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.writes_after_stop.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_written: AtomicU64::new(self.total_written()),
            write_failures: AtomicU64::new(self.write_failures()),
            writes_after_stop: AtomicU64::new(self.writes_after_stop()),
        }
    }
}
