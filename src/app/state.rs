//! The Butler service object: one per process, or one per test.

use std::sync::Arc;

use crate::app::domain::log_entry::LogContext;
use crate::app::infrastructure::clock::{Clock, SystemClock};
use crate::app::infrastructure::platform::{self, Bridge};
use crate::app::infrastructure::tracing_layer::BufferLayer;
use crate::app::services::logger::Logger;
use crate::app::services::settings_store::SettingsStore;
use crate::config::Config;

pub struct Butler {
    bridge: Bridge,
    settings: SettingsStore,
    logger: Arc<Logger>,
}

impl Butler {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build every service for the bridge selected by `config`.
    ///
    /// With a native bridge the log buffer is refilled from the log file.
    /// Settings events are recorded in this instance's own buffer.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let bridge = Bridge::detect(config);
        let sink = bridge.log_sink(config.max_logs);
        let restored = platform::restore_from(sink.as_ref(), config.max_logs);

        let logger = Logger::new(config.max_logs, clock, sink).with_context(LogContext::generate());
        logger.restore(restored);
        let logger = Arc::new(logger);
        let settings = bridge.settings_store().with_logger(logger.clone());

        Self {
            bridge,
            settings,
            logger,
        }
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Layer that mirrors `tracing` events into this instance's log buffer
    pub fn buffer_layer(&self) -> BufferLayer {
        BufferLayer::new(self.logger.clone())
    }

    /// Record the start of a long-running session
    pub fn startup(&self) {
        let mode = if self.bridge.is_native() { "native" } else { "detached" };
        self.logger.append(format!("App started in {} mode.", mode));
        tracing::debug!("Log sink: {}", self.logger.sink_description());
    }

    pub fn shutdown(&self) {
        self.logger.append("App shutting down.");
    }
}
