//! Back-end capabilities, chosen once at start-up.
//!
//! With the native bridge settings live in a JSON file and log entries are
//! appended to a log file. Without it both stay in memory for the lifetime of
//! the process.

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::domain::log_entry::LogEntry;
use crate::app::infrastructure::sink::{FileSink, LogSink, NullSink};
use crate::app::services::settings_store::SettingsStore;
use crate::config::Config;

/// Directory name under the per-user config and data directories
pub const APP_DIR: &str = "butler";

#[derive(Debug, Clone, PartialEq)]
pub enum Bridge {
    Native { config_dir: PathBuf, data_dir: PathBuf },
    Detached,
}

impl Bridge {
    /// Explicit directories win; otherwise the per-user directories from
    /// `dirs`. No resolvable directory means no native bridge.
    pub fn detect(config: &Config) -> Self {
        if config.detached {
            return Self::Detached;
        }

        let config_dir = config
            .config_dir
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR)));
        let data_dir = config
            .data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)));

        match (config_dir, data_dir) {
            (Some(config_dir), Some(data_dir)) => Self::Native { config_dir, data_dir },
            _ => {
                tracing::warn!("No user directories available, settings and logs stay in memory");
                Self::Detached
            }
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }

    pub fn settings_path(&self) -> Option<PathBuf> {
        match self {
            Self::Native { config_dir, .. } => Some(config_dir.join("settings.json")),
            Self::Detached => None,
        }
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        match self {
            Self::Native { data_dir, .. } => Some(data_dir.join("logs").join("butler.log")),
            Self::Detached => None,
        }
    }

    pub fn settings_store(&self) -> SettingsStore {
        match self.settings_path() {
            Some(path) => SettingsStore::file(path),
            None => SettingsStore::memory(),
        }
    }

    /// Log sink keeping about `capacity` entries on disk
    pub fn log_sink(&self, capacity: usize) -> Arc<dyn LogSink> {
        match self.log_path() {
            Some(path) => Arc::new(FileSink::with_capacity(path, capacity)),
            None => Arc::new(NullSink),
        }
    }

    /// Entries persisted by earlier runs, oldest first
    pub fn persisted_logs(&self, count: usize) -> Vec<LogEntry> {
        restore_from(self.log_sink(count).as_ref(), count)
    }
}

/// Newest `count` entries of `sink`; read failures are logged and yield none
pub fn restore_from(sink: &dyn LogSink, count: usize) -> Vec<LogEntry> {
    match sink.load_recent(count) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not read persisted logs: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_when_requested() {
        let config = Config {
            detached: true,
            ..Default::default()
        };
        let bridge = Bridge::detect(&config);
        assert_eq!(bridge, Bridge::Detached);
        assert!(bridge.settings_store().path().is_none());
        assert_eq!(bridge.log_sink(10).describe(), "none");
        assert!(bridge.persisted_logs(10).is_empty());
    }

    #[test]
    fn test_explicit_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            config_dir: Some(dir.path().join("cfg")),
            data_dir: Some(dir.path().join("data")),
            ..Default::default()
        };
        let bridge = Bridge::detect(&config);

        assert!(bridge.is_native());
        assert_eq!(bridge.settings_path(), Some(dir.path().join("cfg").join("settings.json")));
        assert_eq!(
            bridge.log_path(),
            Some(dir.path().join("data").join("logs").join("butler.log"))
        );
        assert_eq!(
            bridge.settings_store().path(),
            Some(dir.path().join("cfg").join("settings.json").as_path())
        );
    }

    #[test]
    fn test_native_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = Bridge::Native {
            config_dir: dir.path().to_path_buf(),
            data_dir: dir.path().to_path_buf(),
        };
        let sink = bridge.log_sink(10);
        sink.write(&LogEntry::new(chrono::Utc::now(), crate::app::domain::log_entry::LogLevel::Info, "kept"))
            .unwrap();

        let restored = bridge.persisted_logs(10);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].message, "kept");
    }
}
