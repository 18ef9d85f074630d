use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Target used for entries recorded by the application itself
pub const APP_TARGET: &str = "butler";

/// Target used for entries forwarded by the front end
pub const FRONTEND_TARGET: &str = "frontend";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Parse a level name; anything unrecognised is treated as INFO.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Self::Trace,
            "DEBUG" => Self::Debug,
            "WARN" | "WARNING" => Self::Warn,
            "ERROR" => Self::Error,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<&tracing::Level> for LogLevel {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

/// One line in the log viewer. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl LogEntry {
    /// Minimal entry: a message at a point in time
    pub fn new(timestamp: DateTime<Utc>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
            target: APP_TARGET.to_string(),
            correlation_id: None,
            user_id: None,
            session_id: None,
            properties: BTreeMap::new(),
            exception: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Fill ids and properties from `context`; values already on the entry win.
    pub fn with_context(mut self, context: &LogContext) -> Self {
        if self.correlation_id.is_none() {
            self.correlation_id = context.correlation_id.clone();
        }
        if self.user_id.is_none() {
            self.user_id = context.user_id.clone();
        }
        if self.session_id.is_none() {
            self.session_id = context.session_id.clone();
        }
        for (key, value) in &context.properties {
            self.properties
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }
}

/// Ids and properties stamped on every entry a logger records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogContext {
    pub correlation_id: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl LogContext {
    /// Fresh context with a random correlation id and session id
    pub fn generate() -> Self {
        Self {
            correlation_id: Some(Uuid::new_v4().to_string()),
            session_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// Entry as sent by the front end. Level is free-form text.
#[derive(Debug, Clone, Deserialize)]
pub struct FrontendLogEntry {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub exception: Option<String>,
}

impl FrontendLogEntry {
    /// Normalize into a [`LogEntry`]; `now` stamps entries sent without a time.
    pub fn into_entry(self, now: DateTime<Utc>) -> LogEntry {
        LogEntry {
            timestamp: self.timestamp.unwrap_or(now),
            level: LogLevel::parse_lenient(&self.level),
            message: format!("[Frontend] {}", self.message),
            target: self.target.unwrap_or_else(|| FRONTEND_TARGET.to_string()),
            correlation_id: self.correlation_id,
            user_id: self.user_id,
            session_id: self.session_id,
            properties: self.properties,
            exception: self.exception,
        }
    }
}
