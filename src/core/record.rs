//! Self-contained log record handed from producer to worker threads

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;
use std::sync::Arc;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<Arc<str>>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> Arc<str> {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()).into())
            .clone()
    })
}

fn current_thread_name() -> Option<Arc<str>> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(Arc::from))
            .clone()
    })
}

/// Call-site location captured by the logging macros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
    pub module_path: &'static str,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32, module_path: &'static str) -> Self {
        Self {
            file,
            line,
            module_path,
        }
    }
}

/// One log event, owning everything it needs to be rendered on another thread
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub logger_name: Arc<str>,
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub thread_id: Arc<str>,
    pub thread_name: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub message: String,
}

impl Record {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a single record can never render as several lines.
    fn sanitize_message(message: String) -> String {
        if !message.contains(&['\n', '\r', '\t'][..]) {
            return message;
        }
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(logger_name: Arc<str>, level: LogLevel, message: String) -> Self {
        Self {
            logger_name,
            level,
            timestamp: Utc::now(),
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
            location: None,
            message: Self::sanitize_message(message),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Thread name if the producer thread had one, otherwise its id
    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_captures_producer_thread() {
        let record = std::thread::Builder::new()
            .name("producer-7".into())
            .spawn(|| Record::new("app".into(), LogLevel::Info, "hello".to_string()))
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(record.thread_name.as_deref(), Some("producer-7"));
        assert_eq!(record.thread_label(), "producer-7");
        assert_eq!(&*record.logger_name, "app");
    }

    #[test]
    fn test_sanitize_message() {
        let record = Record::new(
            "app".into(),
            LogLevel::Warn,
            "line1\nERROR fake\r\tend".to_string(),
        );
        assert_eq!(record.message, "line1\\nERROR fake\\r\\tend");
    }

    #[test]
    fn test_with_location() {
        let record = Record::new("app".into(), LogLevel::Debug, "x".to_string())
            .with_location(SourceLocation::new("src/main.rs", 42, "app::main"));
        let location = record.location.unwrap();
        assert_eq!(location.file, "src/main.rs");
        assert_eq!(location.line, 42);
    }
}
