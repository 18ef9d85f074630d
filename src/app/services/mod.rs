//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Text transformations and the rename preview
//! - The bounded log buffer and the logger on top of it
//! - Log filtering and formatting
//! - Settings persistence

pub mod log_buffer;
pub mod log_view;
pub mod logger;
pub mod rename;
pub mod settings_store;
pub mod text_ops;
