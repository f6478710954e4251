//! Logger metrics for observability
//!
//! Sink failures are never reported to the code that logged, so these
//! counters are how a program can tell its logging is unhealthy.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use message_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_suppressed();
/// metrics.record_routed();
///
/// assert_eq!(metrics.suppressed_count(), 1);
/// assert_eq!(metrics.routed_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Messages rejected by the severity threshold
    suppressed_count: AtomicU64,

    /// Messages that produced a routing decision
    routed_count: AtomicU64,

    /// Routed messages that were also granted a file write
    file_writes: AtomicU64,

    /// Sink writes that returned an error or panicked
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            suppressed_count: AtomicU64::new(0),
            routed_count: AtomicU64::new(0),
            file_writes: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn routed_count(&self) -> u64 {
        self.routed_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn file_writes(&self) -> u64 {
        self.file_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Total messages submitted past argument validation
    pub fn submitted_count(&self) -> u64 {
        self.suppressed_count() + self.routed_count()
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_routed(&self) -> u64 {
        self.routed_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_file_write(&self) -> u64 {
        self.file_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of submitted messages suppressed, as a percentage (0.0 - 100.0)
    pub fn suppression_rate(&self) -> f64 {
        let suppressed = self.suppressed_count() as f64;
        let total = self.submitted_count() as f64;
        if total == 0.0 {
            0.0
        } else {
            (suppressed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.suppressed_count.store(0, Ordering::Relaxed);
        self.routed_count.store(0, Ordering::Relaxed);
        self.file_writes.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
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
            suppressed_count: AtomicU64::new(self.suppressed_count()),
            routed_count: AtomicU64::new(self.routed_count()),
            file_writes: AtomicU64::new(self.file_writes()),
            sink_failures: AtomicU64::new(self.sink_failures()),
        }
    }
}
