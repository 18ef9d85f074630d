//! Controllers layer - entry points the shell calls into.

pub mod ipc;

pub use ipc::{Request, Response};
