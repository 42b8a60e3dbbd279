//! Counters for logger and queue observability
//!
//! Provides counters and statistics for monitoring logger health,
//! including dropped messages, sink failures, queue overruns and discards.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-logger metrics
///
/// # Example
///
/// ```
/// use async_log_engine::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_logged();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records delivered to every admitting sink
    total_logged: AtomicU64,

    /// Records that never reached a sink (overrun, discard, pool gone, timeout)
    dropped_count: AtomicU64,

    /// Individual sink or formatter failures reported to the error handler
    sink_errors: AtomicU64,

    /// Number of times a producer had to wait for queue space
    block_events: AtomicU64,

    /// Number of blocking enqueues that gave up
    block_timeouts: AtomicU64,

    /// Flush jobs completed by a worker
    flushes: AtomicU64,

    /// Flush jobs that never ran (evicted, rejected or abandoned)
    flushes_dropped: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            block_timeouts: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flushes_dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_timeouts(&self) -> u64 {
        self.block_timeouts.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes_dropped(&self) -> u64 {
        self.flushes_dropped.load(Ordering::Relaxed)
    }

    /// Record a delivered entry; returns the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a lost entry; returns the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block_timeout(&self) -> u64 {
        self.block_timeouts.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush_dropped(&self) -> u64 {
        self.flushes_dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged or dropped yet.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_logged() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.block_timeouts.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
        self.flushes_dropped.store(0, Ordering::Relaxed);
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
            total_logged: AtomicU64::new(self.total_logged()),
            dropped_count: AtomicU64::new(self.dropped_count()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            block_events: AtomicU64::new(self.block_events()),
            block_timeouts: AtomicU64::new(self.block_timeouts()),
            flushes: AtomicU64::new(self.flushes()),
            flushes_dropped: AtomicU64::new(self.flushes_dropped()),
        }
    }
}

/// Per-queue metrics, shared by every queue backend
#[derive(Debug, Default)]
pub struct QueueMetrics {
    enqueued: AtomicU64,
    dequeued: AtomicU64,
    overrun: AtomicU64,
    discarded: AtomicU64,
    block_events: AtomicU64,
    block_timeouts: AtomicU64,
}

impl QueueMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            dequeued: AtomicU64::new(0),
            overrun: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            block_timeouts: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Items replaced by overwrite-oldest pushes
    #[inline]
    pub fn overrun(&self) -> u64 {
        self.overrun.load(Ordering::Relaxed)
    }

    /// Items rejected by discard-newest pushes
    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_timeouts(&self) -> u64 {
        self.block_timeouts.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dequeued(&self) {
        self.dequeued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_overrun(&self) -> u64 {
        self.overrun.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_discarded(&self) -> u64 {
        self.discarded.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_block(&self) {
        self.block_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_block_timeout(&self) {
        self.block_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset_overrun(&self) {
        self.overrun.store(0, Ordering::Relaxed);
    }

    pub fn reset_discarded(&self) {
        self.discarded.store(0, Ordering::Relaxed);
    }
}
