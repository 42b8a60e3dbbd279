//! Builder for [`AsyncLogger`]

use super::backend::CoreParts;
use super::AsyncLogger;
use crate::core::{
    ErrorHandler, Formatter, LogLevel, LoggerError, OverflowCallback, OverflowPolicy,
    PatternFormatter, Result, Sink,
};
use crate::pool::PoolHandle;
use std::sync::Arc;
use std::time::Duration;

/// Builder for constructing an [`AsyncLogger`] with a fluent API
///
/// A pool handle is mandatory; everything else has a default: no sinks,
/// [`PatternFormatter`] text output, level `Info`, no auto-flush,
/// [`OverflowPolicy::Block`] without timeout.
///
/// # Example
///
/// ```
/// use async_log_engine::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # fn main() -> async_log_engine::Result<()> {
/// let pool = ThreadPool::new(ThreadPoolConfig::new(1))?;
///
/// let logger = AsyncLogger::builder("payments")
///     .pool(&pool.handle())
///     .min_level(LogLevel::Debug)
///     .flush_level(LogLevel::Error)
///     .block_timeout(Duration::from_millis(50))
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} log jobs lost", count);
///     }))
///     .build()?;
///
/// assert_eq!(logger.flush_level(), LogLevel::Error);
/// # Ok(())
/// # }
/// ```
pub struct AsyncLoggerBuilder {
    name: String,
    sinks: Vec<Arc<dyn Sink>>,
    formatter: Option<Arc<dyn Formatter>>,
    pool: Option<PoolHandle>,
    policy: OverflowPolicy,
    min_level: LogLevel,
    flush_level: LogLevel,
    block_on_flush: bool,
    block_timeout: Option<Duration>,
    error_handler: Option<ErrorHandler>,
    on_overflow: Option<OverflowCallback>,
}

impl AsyncLoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sinks: Vec::new(),
            formatter: None,
            pool: None,
            policy: OverflowPolicy::default(),
            min_level: LogLevel::Info,
            flush_level: LogLevel::Off,
            block_on_flush: false,
            block_timeout: None,
            error_handler: None,
            on_overflow: None,
        }
    }

    /// Add a sink
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Add several sinks, keeping their order
    #[must_use = "builder methods return a new value"]
    pub fn sinks<I>(mut self, sinks: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Sink>>,
    {
        self.sinks.extend(sinks);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Pool whose workers process this logger's jobs
    #[must_use = "builder methods return a new value"]
    pub fn pool(mut self, pool: &PoolHandle) -> Self {
        self.pool = Some(pool.clone());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Auto-flush threshold; `Off` (the default) never auto-flushes
    #[must_use = "builder methods return a new value"]
    pub fn flush_level(mut self, level: LogLevel) -> Self {
        self.flush_level = level;
        self
    }

    /// Make `flush()` wait until the logger's queued jobs are processed
    #[must_use = "builder methods return a new value"]
    pub fn block_on_flush(mut self, enabled: bool) -> Self {
        self.block_on_flush = enabled;
        self
    }

    /// Bound how long the Block policy waits for queue space
    ///
    /// Has no effect on the other policies, except for flush requests,
    /// which always wait for space.
    #[must_use = "builder methods return a new value"]
    pub fn block_timeout(mut self, timeout: Duration) -> Self {
        self.block_timeout = Some(timeout);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// Invoked with the queue's running overrun or discard count on the
    /// first loss and every 1000th after that.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    pub fn build(self) -> Result<AsyncLogger> {
        let Some(pool) = self.pool else {
            return Err(LoggerError::config(
                "AsyncLogger",
                format!("logger '{}' has no thread pool", self.name),
            ));
        };
        if self.name.is_empty() {
            return Err(LoggerError::config("AsyncLogger", "name must not be empty"));
        }

        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(PatternFormatter::default()));

        Ok(AsyncLogger::from_parts(CoreParts {
            name: Arc::from(self.name),
            sinks: Arc::from(self.sinks),
            formatter,
            level: self.min_level,
            flush_level: self.flush_level,
            policy: self.policy,
            block_timeout: self.block_timeout,
            block_on_flush: self.block_on_flush,
            pool,
            error_handler: self.error_handler,
            on_overflow: self.on_overflow,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ThreadPool;

    #[test]
    fn test_build_requires_pool() {
        let err = AsyncLoggerBuilder::new("app").build().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("'app' has no thread pool"));
    }

    #[test]
    fn test_build_rejects_empty_name() {
        let pool = ThreadPool::with_capacity(4, 1).unwrap();
        assert!(AsyncLoggerBuilder::new("").pool(&pool.handle()).build().is_err());
    }

    #[test]
    fn test_defaults() {
        let pool = ThreadPool::with_capacity(4, 1).unwrap();
        let logger = AsyncLoggerBuilder::new("app")
            .pool(&pool.handle())
            .build()
            .unwrap();

        assert_eq!(logger.name(), "app");
        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.flush_level(), LogLevel::Off);
        assert_eq!(logger.overflow_policy(), OverflowPolicy::Block);
        assert!(!logger.block_on_flush());
        assert!(logger.sinks().is_empty());
    }

    #[test]
    fn test_dead_pool_is_accepted_at_build_time() {
        let handle = PoolHandle::detached();
        let logger = AsyncLoggerBuilder::new("late").pool(&handle).build().unwrap();
        assert!(matches!(
            logger.info("x").unwrap_err(),
            LoggerError::PoolGone { .. }
        ));
    }
}
