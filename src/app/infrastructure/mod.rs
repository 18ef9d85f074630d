//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Platform directories and the capability bridge
//! - Log sinks and the `tracing` capture layer
//! - Clock and error types

pub mod clock;
pub mod error;
pub mod platform;
pub mod sink;
pub mod tracing_layer;
