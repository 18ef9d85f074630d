//! `tracing` layer that copies every event into a [`Logger`]'s buffer, so the
//! log viewer shows the application's own diagnostics.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::app::domain::log_entry::{LogEntry, LogLevel};
use crate::app::services::logger::{ECHO_TARGET, Logger, SINK_DIAGNOSTIC_TARGET};

pub struct BufferLayer {
    logger: Arc<Logger>,
}

impl BufferLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for BufferLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Sink failures would otherwise be fed straight back into the sink;
        // echoed entries are already in the buffer.
        if metadata.target() == SINK_DIAGNOSTIC_TARGET || metadata.target() == ECHO_TARGET {
            return;
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);

        let mut entry = LogEntry::new(self.logger.now(), LogLevel::from(metadata.level()), fields.message)
            .with_target(metadata.target());
        entry.properties = fields.properties;
        entry.exception = fields.error;
        self.logger.record(entry);
    }
}

#[derive(Default)]
struct EventFields {
    message: String,
    error: Option<String>,
    properties: BTreeMap<String, serde_json::Value>,
}

impl EventFields {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.properties.insert(field.name().to_string(), value);
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "error" => self.error = Some(value.to_string()),
            _ => self.insert(field, value.into()),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        match field.name() {
            "message" => self.message = rendered,
            "error" => self.error = Some(rendered),
            _ => self.insert(field, rendered.into()),
        }
    }
}
