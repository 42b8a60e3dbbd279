//! Record formatting
//!
//! Workers render each record once through the owning logger's
//! [`Formatter`] and hand the same bytes to every sink. [`PatternFormatter`]
//! is the bundled implementation with three layouts:
//! - Text: `[2025-01-08T10:30:45.123Z] [INFO ] [app] main - Request processed`
//! - Json: one JSON object per line
//! - Logfmt: `timestamp=... level=INFO logger=app message="Request processed"`

use super::error::Result;
use super::record::Record;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Renders a record into the bytes handed to sinks
///
/// Called from worker threads; a returned error is routed to the logger's
/// error handler exactly like a sink failure.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &Record) -> Result<Vec<u8>>;
}

/// Layout produced by [`PatternFormatter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Logfmt,
}

/// Configurable formatter covering the usual text and structured layouts
///
/// ```
/// use async_log_engine::{OutputFormat, PatternFormatter, TimestampFormat};
///
/// let formatter = PatternFormatter::new()
///     .with_output_format(OutputFormat::Logfmt)
///     .with_timestamp_format(TimestampFormat::UnixMillis)
///     .with_source_location(true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternFormatter {
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    include_logger_name: bool,
    include_thread: bool,
    include_source_location: bool,
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Text,
            timestamp_format: TimestampFormat::default(),
            include_logger_name: true,
            include_thread: true,
            include_source_location: false,
        }
    }
}

impl PatternFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Shorthand for a strftime-compatible [`TimestampFormat::Custom`]
    #[must_use]
    pub fn with_custom_timestamp(mut self, pattern: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(pattern.to_string());
        self
    }

    #[must_use]
    pub fn with_logger_name(mut self, include: bool) -> Self {
        self.include_logger_name = include;
        self
    }

    #[must_use]
    pub fn with_thread(mut self, include: bool) -> Self {
        self.include_thread = include;
        self
    }

    #[must_use]
    pub fn with_source_location(mut self, include: bool) -> Self {
        self.include_source_location = include;
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    fn format_text(&self, record: &Record) -> String {
        let mut line = format!(
            "[{}] [{:5}]",
            self.timestamp_format.format(&record.timestamp),
            record.level.to_str()
        );
        if self.include_logger_name {
            let _ = write!(line, " [{}]", record.logger_name);
        }
        if self.include_thread {
            let _ = write!(line, " {}", record.thread_label());
        }
        if self.include_source_location {
            if let Some(location) = record.location {
                let _ = write!(line, " {}:{}", location.file, location.line);
            }
        }
        let _ = write!(line, " - {}", record.message);
        line
    }

    fn format_json(&self, record: &Record) -> Result<String> {
        use serde_json::Value;

        let mut object = serde_json::Map::new();
        let timestamp = match self.timestamp_format.numeric(&record.timestamp) {
            Some(n) => Value::from(n),
            None => Value::String(self.timestamp_format.format(&record.timestamp)),
        };
        object.insert("timestamp".to_string(), timestamp);
        object.insert("level".to_string(), Value::from(record.level.to_str()));
        if self.include_logger_name {
            object.insert("logger".to_string(), Value::from(&*record.logger_name));
        }
        object.insert("message".to_string(), Value::from(record.message.as_str()));
        if self.include_thread {
            object.insert("thread_id".to_string(), Value::from(&*record.thread_id));
            if let Some(ref name) = record.thread_name {
                object.insert("thread_name".to_string(), Value::from(&**name));
            }
        }
        if self.include_source_location {
            if let Some(location) = record.location {
                object.insert("file".to_string(), Value::from(location.file));
                object.insert("line".to_string(), Value::from(location.line));
                object.insert("module_path".to_string(), Value::from(location.module_path));
            }
        }

        Ok(serde_json::to_string(&Value::Object(object))?)
    }

    fn format_logfmt(&self, record: &Record) -> String {
        let mut parts = vec![
            format!(
                "timestamp={}",
                escape_logfmt_value(&self.timestamp_format.format(&record.timestamp))
            ),
            format!("level={}", record.level.to_str()),
        ];
        if self.include_logger_name {
            parts.push(format!("logger={}", escape_logfmt_value(&record.logger_name)));
        }
        // Message is always quoted
        parts.push(format!("message={}", quote_logfmt_value(&record.message)));
        if self.include_thread {
            parts.push(format!("thread={}", escape_logfmt_value(record.thread_label())));
        }
        if self.include_source_location {
            if let Some(location) = record.location {
                parts.push(format!("file={}", escape_logfmt_value(location.file)));
                parts.push(format!("line={}", location.line));
            }
        }
        parts.join(" ")
    }
}

impl Formatter for PatternFormatter {
    fn format(&self, record: &Record) -> Result<Vec<u8>> {
        let mut line = match self.output_format {
            OutputFormat::Text => self.format_text(record),
            OutputFormat::Json => self.format_json(record)?,
            OutputFormat::Logfmt => self.format_logfmt(record),
        };
        line.push('\n');
        Ok(line.into_bytes())
    }
}

fn escape_logfmt_value(value: &str) -> String {
    if value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, SourceLocation};

    fn record(level: LogLevel, message: &str) -> Record {
        Record::new("svc".into(), level, message.to_string())
    }

    fn render(formatter: &PatternFormatter, record: &Record) -> String {
        String::from_utf8(formatter.format(record).unwrap()).unwrap()
    }

    #[test]
    fn test_text_format() {
        let out = render(&PatternFormatter::new(), &record(LogLevel::Info, "Test message"));

        assert!(out.contains("[INFO ]"));
        assert!(out.contains("[svc]"));
        assert!(out.ends_with(" - Test message\n"));
    }

    #[test]
    fn test_text_format_with_location() {
        let formatter = PatternFormatter::new()
            .with_thread(false)
            .with_source_location(true);
        let rec = record(LogLevel::Warn, "careful")
            .with_location(SourceLocation::new("src/db.rs", 17, "svc::db"));

        let out = render(&formatter, &rec);
        assert!(out.contains("src/db.rs:17 - careful"));
    }

    #[test]
    fn test_json_format() {
        let formatter = PatternFormatter::new().with_output_format(OutputFormat::Json);
        let out = render(&formatter, &record(LogLevel::Error, "Error occurred"));

        let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["logger"], "svc");
        assert_eq!(parsed["message"], "Error occurred");
        assert!(parsed["timestamp"].is_string());
    }

    #[test]
    fn test_json_numeric_timestamp() {
        let formatter = PatternFormatter::new()
            .with_output_format(OutputFormat::Json)
            .with_timestamp_format(TimestampFormat::UnixMillis);
        let out = render(&formatter, &record(LogLevel::Info, "tick"));

        let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert!(parsed["timestamp"].is_i64());
    }

    #[test]
    fn test_logfmt_format() {
        let formatter = PatternFormatter::new()
            .with_output_format(OutputFormat::Logfmt)
            .with_thread(false);
        let out = render(&formatter, &record(LogLevel::Warn, "say \"hi\""));

        assert!(out.contains("level=WARN"));
        assert!(out.contains("logger=svc"));
        assert!(out.contains(r#"message="say \"hi\"""#));
    }

    #[test]
    fn test_one_line_per_record() {
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Logfmt] {
            let formatter = PatternFormatter::new().with_output_format(format);
            let out = render(&formatter, &record(LogLevel::Info, "a\nb"));
            assert_eq!(out.matches('\n').count(), 1, "{:?} produced {:?}", format, out);
        }
    }
}
