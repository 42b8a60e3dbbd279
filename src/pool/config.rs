//! Thread pool configuration

use crate::core::{LoggerError, Result};
use crate::queue::QueueBackend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default number of queued jobs a pool can hold
pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

/// Upper bound on worker threads per pool
pub const MAX_WORKERS: usize = 1000;

/// Default time a pool waits for its workers when shutting down
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Hook run on every worker thread, right after start or right before exit
pub type ThreadHook = Arc<dyn Fn() + Send + Sync>;

/// Configuration for [`ThreadPool`](super::ThreadPool)
///
/// # Example
///
/// ```
/// use async_log_engine::{QueueBackend, ThreadPoolConfig};
/// use std::time::Duration;
///
/// let config = ThreadPoolConfig::new(2)
///     .with_queue_capacity(1024)
///     .with_thread_name_prefix("audit-log")
///     .with_backend(QueueBackend::Channel)
///     .with_shutdown_timeout(Duration::from_secs(1));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadPoolConfig {
    /// Capacity of the shared job queue; 0 makes every enqueue overflow
    pub queue_capacity: usize,

    /// Number of worker threads (1..=1000)
    pub worker_count: usize,

    /// Workers are named `{prefix}-{index}`
    pub thread_name_prefix: String,

    /// How long an idle worker waits for a job before re-checking the stop flag
    pub poll_interval: Duration,

    /// Upper bound for posting terminate jobs and for joining workers
    pub shutdown_timeout: Duration,

    pub backend: QueueBackend,

    #[serde(skip)]
    pub on_thread_start: Option<ThreadHook>,

    #[serde(skip)]
    pub on_thread_stop: Option<ThreadHook>,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            worker_count: 1,
            thread_name_prefix: "log-worker".to_string(),
            poll_interval: Duration::from_millis(50),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            backend: QueueBackend::default(),
            on_thread_start: None,
            on_thread_stop: None,
        }
    }
}

impl ThreadPoolConfig {
    /// Default configuration with `worker_count` workers
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    #[must_use]
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: QueueBackend) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn on_thread_start<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_thread_start = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_thread_stop<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_thread_stop = Some(Arc::new(hook));
        self
    }

    /// Check the settings before any thread is spawned
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(LoggerError::config(
                "ThreadPool",
                format!(
                    "worker_count must be between 1 and {}, got {}",
                    MAX_WORKERS, self.worker_count
                ),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(LoggerError::config(
                "ThreadPool",
                "poll_interval must be non-zero",
            ));
        }
        if self.thread_name_prefix.contains('\0') {
            return Err(LoggerError::config(
                "ThreadPool",
                "thread_name_prefix must not contain NUL bytes",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ThreadPoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPoolConfig")
            .field("queue_capacity", &self.queue_capacity)
            .field("worker_count", &self.worker_count)
            .field("thread_name_prefix", &self.thread_name_prefix)
            .field("poll_interval", &self.poll_interval)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("backend", &self.backend)
            .field("on_thread_start", &self.on_thread_start.is_some())
            .field("on_thread_stop", &self.on_thread_stop.is_some())
            .finish()
    }
}
