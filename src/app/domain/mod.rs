//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Text processing options
//! - Log entries and their context
//! - The settings document and typed settings

pub mod log_entry;
pub mod settings;
pub mod text_options;

pub use log_entry::{FrontendLogEntry, LogContext, LogEntry, LogLevel};
pub use settings::{SettingValue, Settings, SettingsDocument, ThemeMode};
pub use text_options::{CaseType, TextProcessingOptions};
