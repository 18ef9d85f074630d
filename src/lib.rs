//! Butler: text transformation, a bounded log buffer and a settings store,
//! served to a desktop shell over JSON requests.

pub mod app;
pub mod config;

pub use app::{Butler, Request, Response};
pub use config::Config;
