use std::collections::VecDeque;

use crate::app::domain::log_entry::LogEntry;

/// Default number of entries kept in memory
pub const MAX_LOGS: usize = 1000;

/// Newest-first sequence of log entries with a hard size cap.
///
/// New entries go to the head; once the cap is exceeded the oldest entry is
/// dropped from the tail.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    logs: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(MAX_LOGS)
    }
}

impl LogBuffer {
    /// A zero capacity is bumped to one so the newest entry is always visible.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            logs: VecDeque::with_capacity(capacity.min(MAX_LOGS)),
            capacity,
        }
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.logs.push_front(entry);
        while self.logs.len() > self.capacity {
            self.logs.pop_back();
        }
    }

    /// Every entry, newest first
    pub fn get_all(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    /// The newest `count` entries, newest first
    pub fn recent(&self, count: usize) -> Vec<LogEntry> {
        self.logs.iter().take(count).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
