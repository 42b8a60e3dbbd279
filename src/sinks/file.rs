//! File sink implementation

use crate::core::{AtomicLevel, LogLevel, Result, Sink};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends records to one file through a buffered writer
///
/// Buffered data reaches the file on [`Sink::flush`] and when the sink is
/// dropped, which happens only after the last job referring to it finished.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    level: AtomicLevel,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(path.into(), false)
    }

    /// Open `path`, discarding any previous content
    ///
    /// ```no_run
    /// use async_log_engine::sinks::FileSink;
    ///
    /// let sink = FileSink::truncated("/var/log/app.log")?;
    /// # Ok::<(), async_log_engine::LoggerError>(())
    /// ```
    pub fn truncated(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(path.into(), true)
    }

    fn open(path: PathBuf, truncate: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        let file = options.open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            level: AtomicLevel::new(LogLevel::Trace),
        })
    }

    #[must_use]
    pub fn with_level(self, level: LogLevel) -> Self {
        self.level.store(level);
        self
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn log(&self, _level: LogLevel, formatted: &[u8]) -> Result<()> {
        self.writer.lock().write_all(formatted)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn level_threshold(&self) -> LogLevel {
        self.level.load()
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        if let Err(e) = self.writer.get_mut().flush() {
            eprintln!(
                "[LOGGER ERROR] Failed to flush '{}' on close: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_reach_file_on_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path).unwrap();

        sink.log(LogLevel::Info, b"first\n").unwrap();
        sink.log(LogLevel::Warn, b"second\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_drop_flushes_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        {
            let sink = FileSink::new(&path).unwrap();
            sink.log(LogLevel::Info, b"buffered\n").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "buffered\n");
    }

    #[test]
    fn test_append_versus_truncate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "old\n").unwrap();

        {
            let sink = FileSink::new(&path).unwrap();
            sink.log(LogLevel::Info, b"new\n").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nnew\n");

        {
            let sink = FileSink::truncated(&path).unwrap();
            sink.log(LogLevel::Info, b"fresh\n").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_level_threshold() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path().join("app.log"))
            .unwrap()
            .with_level(LogLevel::Error);
        assert!(!sink.should_log(LogLevel::Warn));
        assert!(sink.should_log(LogLevel::Error));
        assert_eq!(sink.path().file_name().unwrap(), "app.log");
    }
}
