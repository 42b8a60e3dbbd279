//! Core logger types and traits

pub mod error;
pub mod formatter;
pub mod log_level;
pub mod metrics;
pub mod overflow_policy;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use formatter::{Formatter, OutputFormat, PatternFormatter};
pub use log_level::{AtomicLevel, LogLevel};
pub use metrics::{LoggerMetrics, QueueMetrics};
pub use overflow_policy::{ErrorHandler, OverflowCallback, OverflowPolicy};
pub use record::{Record, SourceLocation};
pub use sink::Sink;
pub use timestamp::TimestampFormat;

pub(crate) use error::panic_message;
