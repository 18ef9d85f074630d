//! Structured logger over the in-memory [`LogBuffer`].
//!
//! Entries land in the buffer first and are then handed to the sink. Sink
//! failures are reported once through `tracing` under
//! [`SINK_DIAGNOSTIC_TARGET`] and never reach the caller.
//!
//! Services that own a logger report through [`Logger::emit`], which also
//! echoes the message to `tracing` under [`ECHO_TARGET`] for the terminal.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::app::domain::log_entry::{FrontendLogEntry, LogContext, LogEntry, LogLevel};
use crate::app::infrastructure::clock::Clock;
use crate::app::infrastructure::sink::LogSink;
use crate::app::services::log_buffer::LogBuffer;

/// Target of the one-off "sink failed" notice; never captured into the buffer.
pub const SINK_DIAGNOSTIC_TARGET: &str = "butler::log_sink";

/// Target of events already recorded by [`Logger::emit`].
pub const ECHO_TARGET: &str = "butler::log_echo";

pub struct Logger {
    buffer: Mutex<LogBuffer>,
    context: Mutex<LogContext>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn LogSink>,
    sink_failure_reported: AtomicBool,
}

impl Logger {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            buffer: Mutex::new(LogBuffer::new(capacity)),
            context: Mutex::new(LogContext::default()),
            clock,
            sink,
            sink_failure_reported: AtomicBool::new(false),
        }
    }

    pub fn with_context(self, context: LogContext) -> Self {
        *lock(&self.context) = context;
        self
    }

    pub fn context(&self) -> LogContext {
        lock(&self.context).clone()
    }

    pub fn update_context<F>(&self, f: F)
    where
        F: FnOnce(&mut LogContext),
    {
        f(&mut lock(&self.context));
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Record `message` at INFO. Always succeeds from the caller's side.
    pub fn append(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Info, message);
        true
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.record(LogEntry::new(self.now(), level, message));
    }

    /// Record `message` and echo it to `tracing`
    pub fn emit(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        echo(level, &message);
        self.log(level, message);
    }

    /// Stamp `entry` with the current context, buffer it, then persist it.
    pub fn record(&self, entry: LogEntry) {
        let entry = entry.with_context(&self.context());
        lock(&self.buffer).append(entry.clone());
        self.persist(&entry);
    }

    pub fn record_frontend(&self, raw: FrontendLogEntry) {
        self.record(raw.into_entry(self.now()));
    }

    /// Put previously persisted entries (oldest first) back into the buffer
    /// without writing them to the sink again.
    pub fn restore(&self, entries: impl IntoIterator<Item = LogEntry>) {
        let mut buffer = lock(&self.buffer);
        for entry in entries {
            buffer.append(entry);
        }
    }

    pub fn get_all(&self) -> Vec<LogEntry> {
        lock(&self.buffer).get_all()
    }

    pub fn recent(&self, count: usize) -> Vec<LogEntry> {
        lock(&self.buffer).recent(count)
    }

    pub fn len(&self) -> usize {
        lock(&self.buffer).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.buffer).is_empty()
    }

    pub fn capacity(&self) -> usize {
        lock(&self.buffer).capacity()
    }

    /// Empty the buffer and the persisted log
    pub fn clear(&self) {
        lock(&self.buffer).clear();
        if let Err(e) = self.sink.truncate() {
            tracing::warn!(target: SINK_DIAGNOSTIC_TARGET, "Failed to truncate log sink: {}", e);
        }
    }

    pub fn sink_description(&self) -> String {
        self.sink.describe()
    }

    fn persist(&self, entry: &LogEntry) {
        if let Err(e) = self.sink.write(entry) {
            if !self.sink_failure_reported.swap(true, Ordering::Relaxed) {
                tracing::warn!(
                    target: SINK_DIAGNOSTIC_TARGET,
                    "Backend logging to {} failed, logs will only be kept in memory: {}",
                    self.sink.describe(),
                    e
                );
            }
        }
    }
}

fn echo(level: LogLevel, message: &str) {
    match level {
        LogLevel::Trace => tracing::trace!(target: ECHO_TARGET, "{}", message),
        LogLevel::Debug => tracing::debug!(target: ECHO_TARGET, "{}", message),
        LogLevel::Info => tracing::info!(target: ECHO_TARGET, "{}", message),
        LogLevel::Warn => tracing::warn!(target: ECHO_TARGET, "{}", message),
        LogLevel::Error => tracing::error!(target: ECHO_TARGET, "{}", message),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
