use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity tag for an activity log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
    Feature,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Error => "error",
            Self::Feature => "feature",
        };
        f.write_str(s)
    }
}

/// A single line in the controller's rolling activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Wall-clock time in 24-hour `HH:MM:SS` form.
    pub timestamp: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current local time.
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }

    /// Renders the entry the way the log viewer shows it.
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp, self.message)
    }
}

/// A bounded queue of log entries. Pushing past capacity evicts the oldest.
///
/// Every push is mirrored to `tracing` so the activity shown to the user is
/// also present in the process log.
#[derive(Debug)]
pub struct ActivityLog {
    items: VecDeque<LogEntry>,
    capacity: usize,
}

impl ActivityLog {
    /// Creates a new log with the given maximum capacity (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a line stamped with the current time.
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        self.push_entry(LogEntry::now(level, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn feature(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Feature, message);
    }

    /// Appends a prepared entry, evicting the oldest if at capacity.
    pub fn push_entry(&mut self, entry: LogEntry) {
        match entry.level {
            LogLevel::Error => tracing::warn!(activity = %entry.level, "{}", entry.message),
            _ => tracing::info!(activity = %entry.level, "{}", entry.message),
        }
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(entry);
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.items.iter()
    }

    /// The most recent entry, shown at full opacity by the viewer.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.items.back()
    }

    /// Whether the entry at `index` (oldest first) is the current one.
    pub fn is_latest(&self, index: usize) -> bool {
        index + 1 == self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(4)
    }
}
