//! Error types for the logging engine

use std::any::Any;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Blocking enqueue gave up before a slot freed
    #[error("Log queue still full after waiting {timeout:?}")]
    QueueTimeout { timeout: Duration },

    /// A logger outlived the thread pool it was bound to
    #[error("Thread pool for logger '{logger}' no longer exists")]
    PoolGone { logger: String },

    /// A sink rejected a record or a flush request
    #[error("Sink '{sink}' failed: {source}")]
    SinkFailure {
        sink: String,
        #[source]
        source: Box<LoggerError>,
    },

    /// A sink panicked while handling a job
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanic { sink: String, message: String },

    /// A flush request was dropped from the queue before any worker ran it
    #[error("Flush request of logger '{logger}' was dropped before it ran")]
    FlushDropped { logger: String },

    /// Pending-job counter was decremented more times than it was incremented
    #[error("Pending job counter underflow in logger '{logger}'")]
    CounterUnderflow { logger: String },

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    Formatter {
        format_type: String,
        message: String,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Worker thread could not be started
    #[error("Failed to spawn worker thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn queue_timeout(timeout: Duration) -> Self {
        LoggerError::QueueTimeout { timeout }
    }

    pub fn pool_gone(logger: impl Into<String>) -> Self {
        LoggerError::PoolGone {
            logger: logger.into(),
        }
    }

    /// Wrap an error raised by a sink together with the sink's name
    pub fn sink_failure(sink: impl Into<String>, source: LoggerError) -> Self {
        LoggerError::SinkFailure {
            sink: sink.into(),
            source: Box::new(source),
        }
    }

    pub fn sink_panic(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanic {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn flush_dropped(logger: impl Into<String>) -> Self {
        LoggerError::FlushDropped {
            logger: logger.into(),
        }
    }

    pub fn counter_underflow(logger: impl Into<String>) -> Self {
        LoggerError::CounterUnderflow {
            logger: logger.into(),
        }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Formatter {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether the error reports lost or undeliverable work rather than a
    /// misconfiguration
    pub fn is_delivery_failure(&self) -> bool {
        matches!(
            self,
            LoggerError::QueueTimeout { .. }
                | LoggerError::PoolGone { .. }
                | LoggerError::FlushDropped { .. }
                | LoggerError::SinkFailure { .. }
                | LoggerError::SinkPanic { .. }
        )
    }
}

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
