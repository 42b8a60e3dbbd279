//! Shared state behind every [`AsyncLogger`](super::AsyncLogger) handle
//!
//! Producers use the front half (level check, enqueue); workers call the
//! backend half (`backend_log`, `backend_flush`) with a job's ticket.

use super::pending::PendingCounter;
use crate::core::{
    error::panic_message, overflow_policy::should_alert, AtomicLevel, ErrorHandler, Formatter,
    LogLevel, LoggerError, LoggerMetrics, OverflowCallback, OverflowPolicy, Record, Sink,
};
use crate::pool::PoolHandle;
use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub(crate) type SinkSet = Arc<[Arc<dyn Sink>]>;

pub(crate) struct LoggerCore {
    name: Arc<str>,
    sinks: SinkSet,
    formatter: Arc<dyn Formatter>,
    level: AtomicLevel,
    flush_level: AtomicLevel,
    policy: OverflowPolicy,
    block_timeout: Option<Duration>,
    block_on_flush: AtomicBool,
    pool: PoolHandle,
    pending: PendingCounter,
    metrics: LoggerMetrics,
    error_handler: RwLock<Option<ErrorHandler>>,
    on_overflow: Option<OverflowCallback>,
    pool_gone_reported: AtomicBool,
}

/// Everything needed to build a core; filled in by the builder
pub(crate) struct CoreParts {
    pub name: Arc<str>,
    pub sinks: SinkSet,
    pub formatter: Arc<dyn Formatter>,
    pub level: LogLevel,
    pub flush_level: LogLevel,
    pub policy: OverflowPolicy,
    pub block_timeout: Option<Duration>,
    pub block_on_flush: bool,
    pub pool: PoolHandle,
    pub error_handler: Option<ErrorHandler>,
    pub on_overflow: Option<OverflowCallback>,
}

impl LoggerCore {
    pub(crate) fn new(parts: CoreParts) -> Self {
        Self {
            name: parts.name,
            sinks: parts.sinks,
            formatter: parts.formatter,
            level: AtomicLevel::new(parts.level),
            flush_level: AtomicLevel::new(parts.flush_level),
            policy: parts.policy,
            block_timeout: parts.block_timeout,
            block_on_flush: AtomicBool::new(parts.block_on_flush),
            pool: parts.pool,
            pending: PendingCounter::new(),
            metrics: LoggerMetrics::new(),
            error_handler: RwLock::new(parts.error_handler),
            on_overflow: parts.on_overflow,
            pool_gone_reported: AtomicBool::new(false),
        }
    }

    /// Parts for a sibling logger: shared sinks, formatter and pool,
    /// current thresholds and handlers, under a new name
    pub(crate) fn sibling_parts(&self, name: Arc<str>) -> CoreParts {
        CoreParts {
            name,
            sinks: Arc::clone(&self.sinks),
            formatter: Arc::clone(&self.formatter),
            level: self.level.load(),
            flush_level: self.flush_level.load(),
            policy: self.policy,
            block_timeout: self.block_timeout,
            block_on_flush: self.block_on_flush(),
            pool: self.pool.clone(),
            error_handler: self.error_handler.read().clone(),
            on_overflow: self.on_overflow.clone(),
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub(crate) fn sinks(&self) -> &SinkSet {
        &self.sinks
    }

    #[inline]
    pub(crate) fn level(&self) -> &AtomicLevel {
        &self.level
    }

    #[inline]
    pub(crate) fn flush_level(&self) -> &AtomicLevel {
        &self.flush_level
    }

    #[inline]
    pub(crate) fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    #[inline]
    pub(crate) fn block_timeout(&self) -> Option<Duration> {
        self.block_timeout
    }

    #[inline]
    pub(crate) fn block_on_flush(&self) -> bool {
        self.block_on_flush.load(Ordering::Relaxed)
    }

    pub(crate) fn set_block_on_flush(&self, enabled: bool) {
        self.block_on_flush.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn pool(&self) -> &PoolHandle {
        &self.pool
    }

    #[inline]
    pub(crate) fn pending(&self) -> &PendingCounter {
        &self.pending
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub(crate) fn set_error_handler(&self, handler: Option<ErrorHandler>) {
        *self.error_handler.write() = handler;
    }

    /// Format once, then write to every sink that admits the level
    ///
    /// Each sink call is isolated: an error or panic in one sink is reported
    /// and the remaining sinks still receive the record.
    pub(crate) fn backend_log(&self, record: &Record) {
        let formatted = match catch_unwind(AssertUnwindSafe(|| self.formatter.format(record))) {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                self.metrics.record_dropped();
                self.report(e);
                return;
            }
            Err(panic_info) => {
                self.metrics.record_dropped();
                self.report(LoggerError::formatter(
                    "panic",
                    panic_message(panic_info.as_ref()),
                ));
                return;
            }
        };

        let mut has_error = false;
        for sink in self.sinks.iter() {
            if !sink.should_log(record.level) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| sink.log(record.level, &formatted))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    has_error = true;
                    self.report(LoggerError::sink_failure(sink.name(), e));
                }
                Err(panic_info) => {
                    has_error = true;
                    self.report(LoggerError::sink_panic(
                        sink.name(),
                        panic_message(panic_info.as_ref()),
                    ));
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }

        if self.flush_level.admits(record.level) {
            self.flush_sinks();
        }
    }

    pub(crate) fn backend_flush(&self) {
        self.flush_sinks();
        self.metrics.record_flush();
    }

    fn flush_sinks(&self) {
        for sink in self.sinks.iter() {
            match catch_unwind(AssertUnwindSafe(|| sink.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.report(LoggerError::sink_failure(sink.name(), e)),
                Err(panic_info) => self.report(LoggerError::sink_panic(
                    sink.name(),
                    panic_message(panic_info.as_ref()),
                )),
            }
        }
    }

    /// Route a worker-side error to the error handler
    ///
    /// Without a custom handler the error goes to stderr, rate-limited.
    pub(crate) fn report(&self, err: LoggerError) {
        let nth = self.metrics.record_sink_error();
        let handler = self.error_handler.read().clone();
        match handler {
            Some(handler) => {
                if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| handler(&err))) {
                    eprintln!(
                        "[LOGGER CRITICAL] Error handler of logger '{}' panicked ({}) while handling: {}",
                        self.name,
                        panic_message(panic_info.as_ref()),
                        err
                    );
                }
            }
            None => {
                if should_alert(nth) {
                    eprintln!("[LOGGER ERROR] {}: {} ({} error(s) so far)", self.name, err, nth + 1);
                }
            }
        }
    }

    /// Alert about jobs lost to overflow; `lost` is the queue's overrun or
    /// discard count as of this loss, so each value is seen by one producer
    pub(crate) fn report_overflow(&self, lost: u64) {
        // Counters are 1-based here; should_alert takes a 0-based index
        if !should_alert(lost.saturating_sub(1)) {
            return;
        }
        eprintln!(
            "[LOGGER WARNING] Log queue full ({} policy): {} job(s) lost so far (logger '{}')",
            self.policy, lost, self.name
        );
        if let Some(callback) = &self.on_overflow {
            callback(lost);
        }
    }

    /// Print the pool-gone warning once per logger
    pub(crate) fn report_pool_gone(&self) {
        if !self.pool_gone_reported.swap(true, Ordering::Relaxed) {
            eprintln!(
                "[LOGGER WARNING] Thread pool for logger '{}' is gone; messages are being dropped",
                self.name
            );
        }
    }
}

impl std::fmt::Debug for LoggerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerCore")
            .field("name", &self.name)
            .field("sinks", &self.sinks.len())
            .field("level", &self.level.load())
            .field("policy", &self.policy)
            .field("pending", &self.pending.get())
            .finish()
    }
}
