use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::app::domain::log_entry::{LogEntry, LogLevel};

/// Log viewer query. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogFilter {
    #[serde(default)]
    pub level: Option<LogLevel>,
    /// Case-insensitive substring of the message or target
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if self.level.is_some_and(|level| entry.level != level) {
            return false;
        }

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !entry.message.to_lowercase().contains(&needle)
                && !entry.target.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if self.correlation_id.is_some() && entry.correlation_id != self.correlation_id {
            return false;
        }

        if self.user_id.is_some() && entry.user_id != self.user_id {
            return false;
        }

        true
    }
}

/// Keep matching entries in their given order, up to `filter.limit`
pub fn filter_logs<'a, I>(logs: I, filter: &LogFilter) -> Vec<LogEntry>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    logs.into_iter()
        .filter(|entry| filter.matches(entry))
        .take(filter.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

/// One-line rendering for the terminal and the plain-text log view
pub fn format_entry(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    let mut formatted = format!("[{}] {:<5} {}", timestamp, entry.level, entry.message);

    if let Some(correlation_id) = &entry.correlation_id {
        formatted.push_str(&format!(" [CorrelationId: {}]", correlation_id));
    }

    if let Some(user_id) = &entry.user_id {
        formatted.push_str(&format!(" [UserId: {}]", user_id));
    }

    if !entry.properties.is_empty() {
        let props: Vec<String> = entry
            .properties
            .iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => format!("{}={}", k, s),
                other => format!("{}={}", k, other),
            })
            .collect();
        formatted.push_str(&format!(" [{}]", props.join(", ")));
    }

    if let Some(exception) = &entry.exception {
        formatted.push_str(&format!(" ({})", exception));
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        let at = Utc.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap();
        LogEntry::new(at, level, message)
    }

    fn sample() -> Vec<LogEntry> {
        vec![
            entry(LogLevel::Error, "Failed to write settings"),
            entry(LogLevel::Info, "Setting updated: theme=dark").with_target("butler::settings"),
            entry(LogLevel::Info, "App started"),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let logs = sample();
        assert_eq!(filter_logs(&logs, &LogFilter::default()).len(), 3);
    }

    #[test]
    fn test_filter_by_level_and_limit() {
        let logs = sample();
        let filter = LogFilter {
            level: Some(LogLevel::Info),
            limit: Some(1),
            ..Default::default()
        };
        let result = filter_logs(&logs, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].message, "Setting updated: theme=dark");
    }

    #[test]
    fn test_search_covers_message_and_target() {
        let logs = sample();
        let by_message = LogFilter {
            search: Some("FAILED".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_logs(&logs, &by_message).len(), 1);

        let by_target = LogFilter {
            search: Some("settings".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_logs(&logs, &by_target).len(), 2);
    }

    #[test]
    fn test_filter_by_ids() {
        let mut logs = sample();
        logs[2].user_id = Some("ada".to_string());
        logs[2].correlation_id = Some("c1".to_string());

        let filter = LogFilter {
            user_id: Some("ada".to_string()),
            correlation_id: Some("c1".to_string()),
            ..Default::default()
        };
        let result = filter_logs(&logs, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].message, "App started");
    }

    #[test]
    fn test_format_entry() {
        let mut e = entry(LogLevel::Warn, "Low disk")
            .with_property("free_mb", serde_json::json!(12))
            .with_property("volume", serde_json::json!("home"));
        e.correlation_id = Some("c1".to_string());
        e.user_id = Some("ada".to_string());

        let line = format_entry(&e);
        assert!(line.starts_with('['));
        assert!(line.contains("] WARN  Low disk"));
        assert!(line.ends_with(" [CorrelationId: c1] [UserId: ada] [free_mb=12, volume=home]"));
    }
}
