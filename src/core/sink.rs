//! Sink trait for log output destinations

use super::{error::Result, log_level::LogLevel};

/// Destination for formatted records
///
/// Sinks are only ever invoked from worker threads, and with more than one
/// worker two threads may call the same sink at once, hence `&self` methods
/// and the `Send + Sync` bound.
pub trait Sink: Send + Sync {
    /// Write one formatted record; `level` is the record's level
    fn log(&self, level: LogLevel, formatted: &[u8]) -> Result<()>;

    fn flush(&self) -> Result<()>;

    /// Records below this level are not passed to [`Sink::log`]
    fn level_threshold(&self) -> LogLevel;

    fn name(&self) -> &str;

    #[inline]
    fn should_log(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level_threshold()
    }
}
