//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The level check
//! runs before the message is formatted, and the call site (file, line,
//! module) is attached to the record. Each macro evaluates to the
//! `Result<()>` returned by [`AsyncLogger::log_at`](crate::AsyncLogger::log_at).
//!
//! # Examples
//!
//! ```
//! use async_log_engine::prelude::*;
//! use async_log_engine::info;
//!
//! # fn main() -> async_log_engine::Result<()> {
//! let pool = ThreadPool::new(ThreadPoolConfig::new(1))?;
//! let logger = AsyncLogger::builder("server").pool(&pool.handle()).build()?;
//!
//! // Basic logging
//! info!(logger, "Server started")?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//! # Ok(())
//! # }
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use async_log_engine::prelude::*;
/// # let pool = ThreadPool::new(ThreadPoolConfig::new(1)).unwrap();
/// # let logger = AsyncLogger::builder("app").pool(&pool.handle()).build().unwrap();
/// use async_log_engine::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.should_log(level) {
            logger.log_at(
                level,
                $crate::SourceLocation::new(file!(), line!(), module_path!()),
                format!($($arg)+),
            )
        } else {
            ::std::result::Result::<(), $crate::LoggerError>::Ok(())
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use async_log_engine::prelude::*;
/// # let pool = ThreadPool::new(ThreadPoolConfig::new(1)).unwrap();
/// # let logger = AsyncLogger::builder("app").pool(&pool.handle()).build().unwrap();
/// use async_log_engine::info;
/// info!(logger, "Application started").unwrap();
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, PatternFormatter, Result, Sink};
    use crate::{AsyncLogger, ThreadPool, ThreadPoolConfig};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Capture(Mutex<Vec<String>>);

    impl Sink for Capture {
        fn log(&self, _level: LogLevel, formatted: &[u8]) -> Result<()> {
            self.0.lock().push(String::from_utf8_lossy(formatted).into_owned());
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn level_threshold(&self) -> LogLevel {
            LogLevel::Trace
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    fn setup() -> (ThreadPool, AsyncLogger, Arc<Capture>) {
        let pool = ThreadPool::new(ThreadPoolConfig::new(1)).unwrap();
        let capture = Arc::new(Capture::default());
        let logger = AsyncLogger::builder("macros")
            .sink(capture.clone())
            .formatter(Arc::new(PatternFormatter::new().with_source_location(true)))
            .pool(&pool.handle())
            .min_level(LogLevel::Trace)
            .build()
            .unwrap();
        (pool, logger, capture)
    }

    #[test]
    fn test_level_macros() {
        let (_pool, logger, capture) = setup();
        trace!(logger, "Trace message").unwrap();
        debug!(logger, "Count: {}", 5).unwrap();
        info!(logger, "Items: {}", 100).unwrap();
        warn!(logger, "Retry {} of {}", 1, 3).unwrap();
        error!(logger, "Code: {}", 500).unwrap();
        fatal!(logger, "Critical failure: {}", "system").unwrap();
        logger.wait();

        let lines = capture.0.lock().clone();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].contains("Count: 5"));
        assert!(lines[5].contains("[FATAL]"));
    }

    #[test]
    fn test_macro_attaches_call_site() {
        let (_pool, logger, capture) = setup();
        let line = line!() + 1;
        log!(logger, LogLevel::Info, "located").unwrap();
        logger.wait();

        let lines = capture.0.lock().clone();
        assert!(lines[0].contains(&format!("macros.rs:{}", line)));
    }

    #[test]
    fn test_disabled_level_skips_formatting() {
        struct Loud(AtomicUsize);
        impl std::fmt::Display for Loud {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fetch_add(1, Ordering::SeqCst);
                write!(f, "loud")
            }
        }

        let (_pool, logger, _capture) = setup();
        logger.set_level(LogLevel::Error);
        let arg = Loud(AtomicUsize::new(0));

        debug!(logger, "{}", arg).unwrap();
        assert_eq!(arg.0.load(Ordering::SeqCst), 0);

        error!(logger, "{}", arg).unwrap();
        assert_eq!(arg.0.load(Ordering::SeqCst), 1);
    }
}
