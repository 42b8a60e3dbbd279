//! # Async Log Engine
//!
//! Asynchronous logging on a shared worker pool: producer threads enqueue
//! records into one bounded queue, pool workers format them and write them
//! to sinks.
//!
//! ## Features
//!
//! - **Bounded queue**: one fixed-capacity MPMC queue per pool, lock-based or
//!   channel-based
//! - **Overflow policies**: block, overwrite the oldest job, or discard the
//!   new one, chosen per logger
//! - **Flush coordination**: `flush()` and `wait()` block until a logger's
//!   queued jobs are done
//! - **Safe teardown**: a logger's sinks live until its last queued job has
//!   run; loggers outliving their pool get `PoolGone` instead of hanging
//!
//! ## Quick Start
//!
//! ```
//! use async_log_engine::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> async_log_engine::Result<()> {
//! let pool = ThreadPool::new(ThreadPoolConfig::new(2).with_queue_capacity(4096))?;
//!
//! let logger = AsyncLogger::builder("app")
//!     .sink(Arc::new(ConsoleSink::new()))
//!     .pool(&pool.handle())
//!     .build()?;
//!
//! logger.info("Application started")?;
//! logger.flush()?;
//! logger.wait();
//!
//! pool.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod factory;
pub mod logger;
pub mod macros;
pub mod pool;
pub mod queue;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::core::{
        ErrorHandler, Formatter, LogLevel, LoggerError, LoggerMetrics, OutputFormat,
        OverflowCallback, OverflowPolicy, PatternFormatter, Record, Result, Sink,
        TimestampFormat,
    };
    pub use crate::logger::{AsyncLogger, AsyncLoggerBuilder};
    pub use crate::pool::{PoolHandle, ThreadPool, ThreadPoolConfig};
    pub use crate::queue::QueueBackend;
}

pub use crate::core::{
    AtomicLevel, ErrorHandler, Formatter, LogLevel, LoggerError, LoggerMetrics, OutputFormat,
    OverflowCallback, OverflowPolicy, PatternFormatter, QueueMetrics, Record, Result, Sink,
    SourceLocation, TimestampFormat,
};
pub use factory::{create_async_logger, create_pool, shutdown_pool};
pub use logger::{AsyncLogger, AsyncLoggerBuilder, PendingCounter};
pub use pool::{PoolHandle, ThreadHook, ThreadPool, ThreadPoolConfig};
pub use queue::{BoundedQueue, ChannelQueue, QueueBackend, Rejected, RingQueue};
#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use sinks::FileSink;
