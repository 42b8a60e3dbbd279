//! Asynchronous logger front-end
//!
//! An [`AsyncLogger`] does the cheap part of logging on the calling thread
//! (level check, record construction) and hands the rest to a
//! [`ThreadPool`](crate::ThreadPool): formatting and sink I/O run on the
//! pool's workers.
//!
//! # Example
//!
//! ```
//! use async_log_engine::prelude::*;
//!
//! # fn main() -> async_log_engine::Result<()> {
//! let pool = ThreadPool::new(ThreadPoolConfig::new(1))?;
//!
//! let logger = AsyncLogger::builder("app")
//!     .pool(&pool.handle())
//!     .overflow_policy(OverflowPolicy::OverrunOldest)
//!     .min_level(LogLevel::Debug)
//!     .build()?;
//!
//! logger.info("service started")?;
//! logger.debug(format!("listening on port {}", 8080))?;
//!
//! logger.flush()?;
//! logger.wait();
//! assert_eq!(logger.pending_count(), 0);
//!
//! pool.shutdown();
//! # Ok(())
//! # }
//! ```

mod backend;
mod builder;
mod pending;

pub use builder::AsyncLoggerBuilder;
pub use pending::PendingCounter;

pub(crate) use backend::LoggerCore;

use backend::CoreParts;
use crate::core::{
    ErrorHandler, LogLevel, LoggerError, LoggerMetrics, OverflowPolicy, Record, Result, Sink,
    SourceLocation,
};
use crate::pool::job::{Job, JobTicket, TicketKind};
use crate::pool::{Enqueued, PoolHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Handle to an asynchronous logger
///
/// Cloning the handle is cheap and every clone shares the same sinks,
/// pending counter and metrics. Use [`AsyncLogger::clone_with_name`] for an
/// independent logger writing to the same sinks.
///
/// The backend stays alive while any handle or any queued job refers to it,
/// so dropping the last handle never loses already-accepted records.
#[derive(Clone)]
pub struct AsyncLogger {
    core: Arc<LoggerCore>,
}

impl AsyncLogger {
    pub fn builder(name: impl Into<String>) -> AsyncLoggerBuilder {
        AsyncLoggerBuilder::new(name)
    }

    pub(crate) fn from_parts(parts: CoreParts) -> Self {
        Self {
            core: Arc::new(LoggerCore::new(parts)),
        }
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    /// Minimum level that is enqueued
    pub fn level(&self) -> LogLevel {
        self.core.level().load()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.core.level().store(level);
    }

    /// Lock-free check whether a record at `level` would be enqueued
    #[inline]
    pub fn should_log(&self, level: LogLevel) -> bool {
        self.core.level().admits(level)
    }

    /// Enqueue a record
    ///
    /// A disabled level returns `Ok(())` without building anything. Errors:
    /// [`LoggerError::PoolGone`] once the pool has shut down and
    /// [`LoggerError::QueueTimeout`] when a Block policy with a block timeout
    /// gives up. Records lost to the non-blocking policies are counted, not
    /// reported as errors.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        if !self.should_log(level) {
            return Ok(());
        }
        let record = Record::new(Arc::clone(self.core.name_arc()), level, message.into());
        self.submit(record)
    }

    /// Like [`AsyncLogger::log`] with the call site attached
    pub fn log_at(
        &self,
        level: LogLevel,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Result<()> {
        if !self.should_log(level) {
            return Ok(());
        }
        let record = Record::new(Arc::clone(self.core.name_arc()), level, message.into())
            .with_location(location);
        self.submit(record)
    }

    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    /// Ask the workers to flush every sink
    ///
    /// Returns once the request is queued; with
    /// [`set_block_on_flush(true)`](AsyncLogger::set_block_on_flush) it also
    /// waits until every job this logger queued so far has been processed.
    ///
    /// A queued flush request can still be evicted by another logger using
    /// [`OverflowPolicy::OverrunOldest`] on the same pool. The loss is counted
    /// in [`LoggerMetrics::flushes_dropped`], and a waiting `flush` returns
    /// [`LoggerError::FlushDropped`].
    pub fn flush(&self) -> Result<()> {
        // A flush request waits for room even under the non-blocking
        // policies; only the block timeout bounds it
        if !self.core.block_on_flush() {
            return self.post(TicketKind::Flush, OverflowPolicy::Block, Job::flush);
        }

        let ran = Arc::new(AtomicBool::new(false));
        let receipt = Arc::clone(&ran);
        self.post(TicketKind::Flush, OverflowPolicy::Block, move |ticket| {
            Job::flush(ticket.with_receipt(receipt))
        })?;
        self.wait();

        if ran.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(LoggerError::flush_dropped(self.name()))
        }
    }

    /// Block until no job of this logger is queued or in flight
    ///
    /// Returns immediately if nothing is pending.
    pub fn wait(&self) {
        self.core.pending().wait();
    }

    /// [`AsyncLogger::wait`] with a timeout; returns whether everything
    /// finished in time
    pub fn wait_for(&self, timeout: Duration) -> bool {
        self.core.pending().wait_for(timeout)
    }

    /// Jobs of this logger that are queued or being processed
    pub fn pending_count(&self) -> usize {
        self.core.pending().get()
    }

    /// Independent logger sharing this one's sinks, formatter and pool
    ///
    /// Level thresholds, policy and handlers are copied. Pending counter and
    /// metrics start fresh, so `wait` on either logger only covers its own
    /// jobs.
    pub fn clone_with_name(&self, name: impl Into<String>) -> AsyncLogger {
        let name: Arc<str> = Arc::from(name.into());
        Self::from_parts(self.core.sibling_parts(name))
    }

    /// Flush sinks automatically after every record at or above `level`
    ///
    /// `LogLevel::Off` disables auto-flush.
    pub fn flush_on(&self, level: LogLevel) {
        self.core.flush_level().store(level);
    }

    pub fn flush_level(&self) -> LogLevel {
        self.core.flush_level().load()
    }

    pub fn set_block_on_flush(&self, enabled: bool) {
        self.core.set_block_on_flush(enabled);
    }

    pub fn block_on_flush(&self) -> bool {
        self.core.block_on_flush()
    }

    /// Replace the handler receiving worker-side errors
    ///
    /// `None` restores the default, which prints to stderr.
    pub fn set_error_handler(&self, handler: Option<ErrorHandler>) {
        self.core.set_error_handler(handler);
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        self.core.sinks()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.core.metrics()
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.core.policy()
    }

    pub fn pool(&self) -> &PoolHandle {
        self.core.pool()
    }

    fn submit(&self, record: Record) -> Result<()> {
        let policy = self.core.policy();
        self.post(TicketKind::Log, policy, |ticket| Job::log(ticket, record))
    }

    fn post(
        &self,
        kind: TicketKind,
        policy: OverflowPolicy,
        make_job: impl FnOnce(JobTicket) -> Job,
    ) -> Result<()> {
        let Some(pool) = self.core.pool().upgrade() else {
            return Err(self.pool_gone(kind));
        };

        // Counted before the push: a worker may finish the job before
        // enqueue even returns
        let ticket = JobTicket::issue(Arc::clone(&self.core), kind);
        let block_timeout = self.core.block_timeout();

        match pool.enqueue(make_job(ticket), policy, block_timeout) {
            Enqueued::Accepted { waited } => {
                if waited {
                    self.core.metrics().record_block();
                }
                Ok(())
            }
            Enqueued::Overran { overruns } => {
                self.core.report_overflow(overruns);
                Ok(())
            }
            Enqueued::Discarded { discarded } => {
                self.core.report_overflow(discarded);
                Ok(())
            }
            Enqueued::TimedOut => {
                self.core.metrics().record_block();
                self.core.metrics().record_block_timeout();
                Err(LoggerError::queue_timeout(
                    block_timeout.unwrap_or(Duration::ZERO),
                ))
            }
            Enqueued::Closed => {
                // The rejected job's ticket already counted the drop
                self.core.report_pool_gone();
                Err(LoggerError::pool_gone(self.name()))
            }
        }
    }

    fn pool_gone(&self, kind: TicketKind) -> LoggerError {
        if kind == TicketKind::Log {
            self.core.metrics().record_dropped();
        }
        self.core.report_pool_gone();
        LoggerError::pool_gone(self.name())
    }
}

impl std::fmt::Debug for AsyncLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncLogger")
            .field("core", &self.core)
            .finish()
    }
}
