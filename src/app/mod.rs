//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (settings, log entries, text options)
//! - `controllers/` - The request/response surface (IPC)
//! - `services/` - Business operations (text pipeline, logger, settings store)
//! - `infrastructure/` - External integrations (files, clock, tracing, error)
//! - `state.rs` - The Butler service object

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::{Request, Response};
pub use domain::{CaseType, LogEntry, LogLevel, SettingValue, Settings, SettingsDocument, TextProcessingOptions};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::platform::Bridge;
pub use state::Butler;
