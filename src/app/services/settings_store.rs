use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::app::domain::log_entry::LogLevel;
use crate::app::domain::settings::{SettingValue, Settings, SettingsDocument};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::logger::Logger;

enum Backing {
    File(PathBuf),
    Memory(Mutex<SettingsDocument>),
}

/// Read-modify-write access to the flat settings document.
///
/// Every update rewrites the whole document. Failures never propagate out of
/// the `*_settings`/`set_setting` calls; they are logged and turned into an
/// empty document or a `false` result. With a logger attached the log entries
/// land in that logger's buffer, otherwise they only go to `tracing`.
pub struct SettingsStore {
    backing: Backing,
    update_lock: Mutex<()>,
    logger: Option<Arc<Logger>>,
}

impl SettingsStore {
    /// Store persisted as pretty JSON at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backing: Backing::File(path.into()),
            update_lock: Mutex::new(()),
            logger: None,
        }
    }

    /// Store that lives only as long as the process
    pub fn memory() -> Self {
        Self {
            backing: Backing::Memory(Mutex::new(SettingsDocument::new())),
            update_lock: Mutex::new(()),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path.as_path()),
            Backing::Memory(_) => None,
        }
    }

    /// Load the document; a missing file is an empty document
    pub fn load(&self) -> Result<SettingsDocument> {
        match &self.backing {
            Backing::File(path) => match fs::read_to_string(path) {
                Ok(contents) => Ok(serde_json::from_str(&contents)?),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(SettingsDocument::new()),
                Err(e) => Err(e.into()),
            },
            Backing::Memory(doc) => Ok(lock(doc).clone()),
        }
    }

    /// Overwrite the whole document
    pub fn save(&self, doc: &SettingsDocument) -> Result<()> {
        match &self.backing {
            Backing::File(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let json = serde_json::to_string_pretty(doc)?;
                fs::write(path, json)?;
            }
            Backing::Memory(stored) => *lock(stored) = doc.clone(),
        }
        Ok(())
    }

    pub fn read_settings(&self) -> SettingsDocument {
        match self.load() {
            Ok(doc) => doc,
            Err(e) => {
                self.report(
                    LogLevel::Warn,
                    format!("Error reading settings: {}. Using an empty document.", e),
                );
                SettingsDocument::new()
            }
        }
    }

    pub fn write_settings(&self, doc: &SettingsDocument) -> bool {
        match self.save(doc) {
            Ok(()) => true,
            Err(e) => {
                self.report(LogLevel::Error, format!("Error writing settings: {}", e));
                false
            }
        }
    }

    /// Merge one key into the stored document and persist it
    pub fn set_setting(&self, key: &str, value: SettingValue) -> bool {
        let _guard = lock(&self.update_lock);
        let mut doc = self.read_settings();
        let rendered = value.to_string();
        doc.set(key, value);
        let saved = self.write_settings(&doc);
        if saved {
            self.report(LogLevel::Info, format!("Setting updated: {}={}", key, rendered));
        }
        saved
    }

    /// Forget every stored value
    pub fn reset_settings(&self) -> bool {
        let _guard = lock(&self.update_lock);
        let result = match &self.backing {
            Backing::File(path) => match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(AppError::from(e)),
            },
            Backing::Memory(doc) => {
                *lock(doc) = SettingsDocument::new();
                Ok(())
            }
        };

        match result {
            Ok(()) => {
                self.report(LogLevel::Warn, "Settings reset to defaults".to_string());
                true
            }
            Err(e) => {
                self.report(LogLevel::Error, format!("Failed to reset settings: {}", e));
                false
            }
        }
    }

    /// Stored values overlaid on the defaults
    pub fn typed_settings(&self) -> Settings {
        Settings::from_document(&self.read_settings())
    }

    pub fn update_typed_settings(&self, settings: &Settings) -> bool {
        let _guard = lock(&self.update_lock);
        let mut doc = self.read_settings();
        settings.merge_into(&mut doc);
        self.write_settings(&doc)
    }

    fn report(&self, level: LogLevel, message: String) {
        match &self.logger {
            Some(logger) => logger.emit(level, message),
            None => match level {
                LogLevel::Error => tracing::error!("{}", message),
                LogLevel::Warn => tracing::warn!("{}", message),
                _ => tracing::info!("{}", message),
            },
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
