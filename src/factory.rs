//! Shorthand constructors for the common pool and logger setups

use crate::core::{OverflowPolicy, Result, Sink};
use crate::logger::AsyncLogger;
use crate::pool::{PoolHandle, ThreadPool, ThreadPoolConfig};
use std::sync::Arc;

/// Start a pool with `worker_count` workers sharing a queue of `capacity`
pub fn create_pool(capacity: usize, worker_count: usize) -> Result<ThreadPool> {
    ThreadPool::new(ThreadPoolConfig::new(worker_count).with_queue_capacity(capacity))
}

/// Build a logger on `pool` with default formatter and levels
///
/// ```
/// use async_log_engine::{create_async_logger, create_pool, shutdown_pool, OverflowPolicy};
///
/// let pool = create_pool(1024, 1)?;
/// let logger = create_async_logger("app", Vec::new(), &pool.handle(), OverflowPolicy::Block)?;
/// logger.info("ready")?;
/// logger.wait();
/// assert!(shutdown_pool(pool));
/// # Ok::<(), async_log_engine::LoggerError>(())
/// ```
pub fn create_async_logger(
    name: impl Into<String>,
    sinks: Vec<Arc<dyn Sink>>,
    pool: &PoolHandle,
    policy: OverflowPolicy,
) -> Result<AsyncLogger> {
    AsyncLogger::builder(name)
        .sinks(sinks)
        .pool(pool)
        .overflow_policy(policy)
        .build()
}

/// Drain and stop `pool`; `true` if every worker exited cleanly
pub fn shutdown_pool(pool: ThreadPool) -> bool {
    pool.shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;

    #[test]
    fn test_create_pool_validates() {
        assert!(matches!(
            create_pool(16, 0).unwrap_err(),
            LoggerError::InvalidConfiguration { .. }
        ));

        let pool = create_pool(16, 2).unwrap();
        assert_eq!(pool.worker_count(), 2);
        assert_eq!(pool.queue_capacity(), 16);
        assert!(shutdown_pool(pool));
    }

    #[test]
    fn test_logger_outlives_pool() {
        let pool = create_pool(16, 1).unwrap();
        let logger =
            create_async_logger("svc", Vec::new(), &pool.handle(), OverflowPolicy::DiscardNew)
                .unwrap();
        assert_eq!(logger.overflow_policy(), OverflowPolicy::DiscardNew);

        assert!(shutdown_pool(pool));
        assert!(logger.info("after shutdown").is_err());
    }
}
