//! Persistent destinations for log entries.
//!
//! Sinks are best effort: the logger reports their errors once and otherwise
//! ignores them.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::app::domain::log_entry::LogEntry;
use crate::app::infrastructure::error::{AppError, Result};

pub trait LogSink: Send + Sync {
    fn write(&self, entry: &LogEntry) -> Result<()>;

    /// The newest `count` persisted entries, oldest first
    fn load_recent(&self, _count: usize) -> Result<Vec<LogEntry>> {
        Ok(Vec::new())
    }

    /// Drop everything persisted so far
    fn truncate(&self) -> Result<()> {
        Ok(())
    }

    /// Human-readable location, for diagnostics
    fn describe(&self) -> String;
}

/// Discards every entry. Used when no native back end is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _entry: &LogEntry) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

/// Appends one compact JSON object per line.
///
/// With a line cap the file is rewritten down to the newest `keep` lines
/// once it holds more than twice that many.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    keep: Option<usize>,
    /// Lines currently in the file, as far as this sink knows
    lines: Mutex<usize>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keep: None,
            lines: Mutex::new(0),
        }
    }

    /// Sink that keeps roughly the newest `keep` entries on disk
    pub fn with_capacity(path: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            keep: Some(keep.max(1)),
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn limit(&self) -> Option<usize> {
        self.keep.map(|keep| keep.saturating_mul(2))
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the file with `lines` through a temporary file
    fn rewrite(&self, lines: &[String]) -> Result<()> {
        let tmp = self.path.with_extension("log.tmp");
        let mut contents = lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }

        fs::write(&tmp, contents)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| AppError::Log(format!("failed to compact {}: {}", self.path.display(), e)))
    }

    /// Trim the file to the newest `keep` lines when it is over the limit
    fn compact(&self, lines: &mut usize) -> Result<()> {
        let (Some(keep), Some(limit)) = (self.keep, self.limit()) else {
            return Ok(());
        };
        if *lines <= limit {
            return Ok(());
        }

        let all = self.read_lines()?;
        let skip = all.len().saturating_sub(keep);
        self.rewrite(&all[skip..])?;
        *lines = all.len() - skip;
        Ok(())
    }
}

impl LogSink for FileSink {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let mut lines = lock(&self.lines);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;
        *lines += 1;

        self.compact(&mut lines)
    }

    /// A missing file yields no entries; lines that fail to parse are skipped.
    /// An oversized file is compacted on the way.
    fn load_recent(&self, count: usize) -> Result<Vec<LogEntry>> {
        let mut lines = lock(&self.lines);
        let raw = self.read_lines()?;
        *lines = raw.len();

        let entries: Vec<LogEntry> = raw
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        let skip = entries.len().saturating_sub(count);
        let recent = entries.into_iter().skip(skip).collect();

        self.compact(&mut lines)?;
        Ok(recent)
    }

    fn truncate(&self) -> Result<()> {
        let mut lines = lock(&self.lines);
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *lines = 0;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
