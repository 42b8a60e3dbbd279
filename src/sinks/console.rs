//! Console sink implementation

use crate::core::{AtomicLevel, LogLevel, Result, Sink};
use colored::Colorize;
use std::io::Write;

/// Writes records to stdout, with Error and Fatal routed to stderr
///
/// With colors enabled the whole line is tinted by level.
pub struct ConsoleSink {
    use_colors: bool,
    level: AtomicLevel,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            level: AtomicLevel::new(LogLevel::Trace),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Only pass records at or above `level`
    ///
    /// ```
    /// use async_log_engine::{LogLevel, Sink};
    /// use async_log_engine::sinks::ConsoleSink;
    ///
    /// let sink = ConsoleSink::new().with_level(LogLevel::Warn);
    /// assert!(!sink.should_log(LogLevel::Info));
    /// ```
    #[must_use]
    pub fn with_level(self, level: LogLevel) -> Self {
        self.level.store(level);
        self
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level);
    }

    fn render(&self, level: LogLevel, formatted: &[u8]) -> Vec<u8> {
        if !self.use_colors {
            return formatted.to_vec();
        }
        let text = String::from_utf8_lossy(formatted);
        let line = text.trim_end_matches('\n');
        format!("{}\n", line.color(level.color_code())).into_bytes()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn log(&self, level: LogLevel, formatted: &[u8]) -> Result<()> {
        let output = self.render(level, formatted);

        // Route Error and Fatal levels to stderr, others to stdout
        match level {
            LogLevel::Error | LogLevel::Fatal => std::io::stderr().lock().write_all(&output)?,
            _ => std::io::stdout().lock().write_all(&output)?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn level_threshold(&self) -> LogLevel {
        self.level.load()
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_is_unchanged() {
        let sink = ConsoleSink::with_colors(false);
        assert_eq!(sink.render(LogLevel::Info, b"hello\n"), b"hello\n".to_vec());
    }

    #[test]
    fn test_colored_output_keeps_single_newline() {
        colored::control::set_override(true);
        let sink = ConsoleSink::new();
        let rendered = String::from_utf8(sink.render(LogLevel::Error, b"boom\n")).unwrap();
        assert!(rendered.contains("boom"));
        assert!(rendered.ends_with('\n'));
        assert!(!rendered.ends_with("\n\n"));
    }

    #[test]
    fn test_runtime_level_change() {
        let sink = ConsoleSink::new();
        assert!(sink.should_log(LogLevel::Debug));
        sink.set_level(LogLevel::Error);
        assert!(!sink.should_log(LogLevel::Warn));
        assert!(sink.should_log(LogLevel::Fatal));
        assert!(!sink.should_log(LogLevel::Off));
    }
}
