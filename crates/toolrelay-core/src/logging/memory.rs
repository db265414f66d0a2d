//! In-memory logger
//!
//! Keeps every record so callers can inspect what happened, e.g. to show a
//! diagnostics panel or to assert in tests that a malformed tool call was
//! reported.

use parking_lot::Mutex;

use super::traits::Logger;

/// Log levels recorded by `MemoryLogger`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A single recorded log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Logger that stores records in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records so far, oldest first
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Messages logged at exactly `level`
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }

    /// True if any record at `level` contains `needle`
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.records.lock().push(LogRecord {
            level,
            message: message.to_string(),
        });
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
