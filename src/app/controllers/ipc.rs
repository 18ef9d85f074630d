//! Request/response surface the desktop shell talks to.
//!
//! Requests arrive as JSON objects tagged by `cmd`; responses are the bare
//! JSON value the shell expects (a settings object, a boolean, a log list...).

use serde::{Deserialize, Serialize};

use crate::app::domain::log_entry::{FrontendLogEntry, LogEntry};
use crate::app::domain::settings::{SettingValue, Settings, SettingsDocument};
use crate::app::domain::text_options::TextProcessingOptions;
use crate::app::services::log_view::{LogFilter, filter_logs};
use crate::app::services::rename::{self, FileInfo, RenamePreview};
use crate::app::services::text_ops::{self, TextOperation};
use crate::app::state::Butler;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum Request {
    GetSettings,
    GetTypedSettings,
    SetSetting { key: String, value: SettingValue },
    UpdateSettings { settings: Settings },
    ResetSettings,
    GetLogs,
    GetRecentLogs { count: usize },
    GetLogCount,
    ClearLogs,
    LogMessage { message: String },
    LogEntry { entry: FrontendLogEntry },
    QueryLogs { filter: LogFilter },
    Transform { text: String, operations: Vec<TextOperation> },
    ProcessText { text: String, options: TextProcessingOptions },
    PreviewRename { files: Vec<FileInfo>, options: TextProcessingOptions },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetSettings => "get-settings",
            Self::GetTypedSettings => "get-typed-settings",
            Self::SetSetting { .. } => "set-setting",
            Self::UpdateSettings { .. } => "update-settings",
            Self::ResetSettings => "reset-settings",
            Self::GetLogs => "get-logs",
            Self::GetRecentLogs { .. } => "get-recent-logs",
            Self::GetLogCount => "get-log-count",
            Self::ClearLogs => "clear-logs",
            Self::LogMessage { .. } => "log-message",
            Self::LogEntry { .. } => "log-entry",
            Self::QueryLogs { .. } => "query-logs",
            Self::Transform { .. } => "transform",
            Self::ProcessText { .. } => "process-text",
            Self::PreviewRename { .. } => "preview-rename",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Settings(SettingsDocument),
    TypedSettings(Settings),
    Success(bool),
    Logs(Vec<LogEntry>),
    Count(usize),
    Text(String),
    Renames(Vec<RenamePreview>),
    Error { error: String },
}

impl Butler {
    /// Serve one request. Never fails; problems show up in the result value
    /// and in the log buffer.
    pub fn handle(&self, request: Request) -> Response {
        tracing::debug!("IPC command invoked: {}", request.name());

        match request {
            Request::GetSettings => Response::Settings(self.settings().read_settings()),
            Request::GetTypedSettings => Response::TypedSettings(self.settings().typed_settings()),
            Request::SetSetting { key, value } => {
                Response::Success(self.settings().set_setting(&key, value))
            }
            Request::UpdateSettings { settings } => {
                Response::Success(self.settings().update_typed_settings(&settings))
            }
            Request::ResetSettings => Response::Success(self.settings().reset_settings()),
            Request::GetLogs => Response::Logs(self.logger().get_all()),
            Request::GetRecentLogs { count } => Response::Logs(self.logger().recent(count)),
            Request::GetLogCount => Response::Count(self.logger().len()),
            Request::ClearLogs => {
                self.logger().clear();
                Response::Success(true)
            }
            Request::LogMessage { message } => Response::Success(self.logger().append(message)),
            Request::LogEntry { entry } => {
                self.logger().record_frontend(entry);
                Response::Success(true)
            }
            Request::QueryLogs { filter } => {
                Response::Logs(filter_logs(&self.logger().get_all(), &filter))
            }
            Request::Transform { text, operations } => {
                Response::Text(text_ops::apply_all(&text, &operations))
            }
            Request::ProcessText { text, options } => {
                Response::Text(text_ops::process_text_with_options(&text, &options))
            }
            Request::PreviewRename { files, options } => {
                Response::Renames(rename::preview(&files, &options))
            }
        }
    }

    /// Serve one JSON request line and render the JSON reply
    pub fn handle_json(&self, line: &str) -> String {
        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                tracing::warn!("Rejected malformed request: {}", e);
                Response::Error {
                    error: format!("invalid request: {}", e),
                }
            }
        };

        serde_json::to_string(&response)
            .unwrap_or_else(|e| format!(r#"{{"error":"failed to encode response: {}"}}"#, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::log_entry::LogLevel;
    use crate::config::Config;
    use serde_json::{Value, json};

    fn butler(dir: &tempfile::TempDir) -> Butler {
        Butler::new(&Config {
            config_dir: Some(dir.path().join("config")),
            data_dir: Some(dir.path().join("data")),
            max_logs: 100,
            detached: false,
        })
    }

    fn call(butler: &Butler, request: Value) -> Value {
        serde_json::from_str(&butler.handle_json(&request.to_string())).unwrap()
    }

    #[test]
    fn test_settings_commands() {
        let dir = tempfile::tempdir().unwrap();
        let butler = butler(&dir);

        assert_eq!(call(&butler, json!({"cmd": "get-settings"})), json!({}));
        assert_eq!(
            call(&butler, json!({"cmd": "set-setting", "key": "theme", "value": "dark"})),
            json!(true)
        );
        assert_eq!(
            call(&butler, json!({"cmd": "set-setting", "key": "autoSaveInterval", "value": 10})),
            json!(true)
        );
        assert_eq!(
            call(&butler, json!({"cmd": "get-settings"})),
            json!({"theme": "dark", "autoSaveInterval": 10})
        );

        let typed = call(&butler, json!({"cmd": "get-typed-settings"}));
        assert_eq!(typed["theme"], json!("dark"));
        assert_eq!(typed["language"], json!("en"));

        assert_eq!(call(&butler, json!({"cmd": "reset-settings"})), json!(true));
        assert_eq!(call(&butler, json!({"cmd": "get-settings"})), json!({}));
    }

    #[test]
    fn test_log_commands() {
        let dir = tempfile::tempdir().unwrap();
        let butler = butler(&dir);

        assert_eq!(
            call(&butler, json!({"cmd": "log-message", "message": "MultiRename: Submit clicked"})),
            json!(true)
        );
        assert_eq!(
            call(&butler, json!({"cmd": "log-entry", "entry": {"level": "ERROR", "message": "boom"}})),
            json!(true)
        );

        let logs = call(&butler, json!({"cmd": "get-logs"}));
        assert_eq!(logs[0]["message"], json!("[Frontend] boom"));
        assert_eq!(logs[0]["level"], json!("ERROR"));
        assert_eq!(logs[1]["message"], json!("MultiRename: Submit clicked"));
        assert!(logs[1]["timestamp"].as_str().unwrap().contains('T'));

        assert_eq!(call(&butler, json!({"cmd": "get-log-count"})), json!(2));
        assert_eq!(
            call(&butler, json!({"cmd": "get-recent-logs", "count": 1})).as_array().unwrap().len(),
            1
        );

        let errors = call(&butler, json!({"cmd": "query-logs", "filter": {"level": "ERROR"}}));
        assert_eq!(errors.as_array().unwrap().len(), 1);

        assert_eq!(call(&butler, json!({"cmd": "clear-logs"})), json!(true));
        assert_eq!(call(&butler, json!({"cmd": "get-log-count"})), json!(0));
    }

    #[test]
    fn test_text_commands() {
        let dir = tempfile::tempdir().unwrap();
        let butler = butler(&dir);

        let processed = call(
            &butler,
            json!({
                "cmd": "process-text",
                "text": "file1\nfile2\nfile3",
                "options": {"renamePattern": "file_{n}", "startNumber": 5}
            }),
        );
        assert_eq!(processed, json!("file_5\nfile_6\nfile_7"));

        let transformed = call(
            &butler,
            json!({
                "cmd": "transform",
                "text": "b\n\na\nb",
                "operations": [{"op": "remove-empty-lines"}, {"op": "remove-duplicate-lines"}, {"op": "sort-lines"}]
            }),
        );
        assert_eq!(transformed, json!("a\nb"));

        let renames = call(
            &butler,
            json!({
                "cmd": "preview-rename",
                "files": [{"name": "a.txt", "path": "/tmp/a.txt"}],
                "options": {"prefix": "old_"}
            }),
        );
        assert_eq!(renames, json!([{"original": "a.txt", "renamed": "old_a.txt"}]));
    }

    #[test]
    fn test_failed_write_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();
        let butler = Butler::new(&Config {
            config_dir: Some(blocker.join("config")),
            data_dir: Some(dir.path().join("data")),
            max_logs: 100,
            detached: false,
        });

        assert_eq!(
            butler.handle(Request::SetSetting {
                key: "theme".to_string(),
                value: SettingValue::from("dark"),
            }),
            Response::Success(false)
        );

        let logs = call(&butler, json!({"cmd": "get-logs"}));
        let errors: Vec<&Value> = logs
            .as_array()
            .unwrap()
            .iter()
            .filter(|entry| entry["level"] == json!("ERROR"))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]["message"].as_str().unwrap().starts_with("Error writing settings"));
    }

    #[test]
    fn test_setting_update_is_logged_per_instance() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let first = butler(&a);
        let second = butler(&b);

        call(&first, json!({"cmd": "set-setting", "key": "language", "value": "fr"}));

        let logs = call(&first, json!({"cmd": "get-logs"}));
        assert_eq!(logs[0]["message"], json!("Setting updated: language=fr"));
        assert_eq!(call(&second, json!({"cmd": "get-log-count"})), json!(0));
    }

    #[test]
    fn test_malformed_request() {
        let dir = tempfile::tempdir().unwrap();
        let butler = butler(&dir);

        let reply: Value = serde_json::from_str(&butler.handle_json("{\"cmd\":\"launch-rockets\"}")).unwrap();
        assert!(reply["error"].as_str().unwrap().starts_with("invalid request"));

        let reply: Value = serde_json::from_str(&butler.handle_json("not json")).unwrap();
        assert!(reply["error"].is_string());
    }

    #[test]
    fn test_handle_typed() {
        let butler = Butler::new(&Config {
            detached: true,
            ..Default::default()
        });
        assert_eq!(
            butler.handle(Request::LogMessage { message: "hi".to_string() }),
            Response::Success(true)
        );
        match butler.handle(Request::GetLogs) {
            Response::Logs(logs) => {
                assert_eq!(logs.len(), 1);
                assert_eq!(logs[0].level, LogLevel::Info);
            }
            other => panic!("unexpected response: {:?}", other),
        }
        assert_eq!(Request::GetLogCount.name(), "get-log-count");
    }
}
