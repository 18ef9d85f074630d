//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::app::services::log_buffer::MAX_LOGS;

/// Runtime configuration for Butler.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding `settings.json`; `None` means the per-user default
    pub config_dir: Option<PathBuf>,
    /// Directory holding `logs/butler.log`; `None` means the per-user default
    pub data_dir: Option<PathBuf>,
    pub max_logs: usize,
    /// Run without persistence even when the user directories are available
    pub detached: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: None,
            data_dir: None,
            max_logs: MAX_LOGS,
            detached: false,
        }
    }
}

/// Expand a leading `~/` to the user's home directory
fn expand_tilde(path: String) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a boolean-like environment flag value.
///
/// Truthy: `1`, `true`, `yes`, `on`. Falsy: `0`, `false`, `no`, `off`, empty.
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_dir(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(expand_tilde)
}

impl Config {
    /// Load configuration from `BUTLER_*` environment variables, falling back
    /// to defaults for anything missing or malformed.
    pub fn from_env() -> Self {
        Self {
            config_dir: env_dir("BUTLER_CONFIG_DIR"),
            data_dir: env_dir("BUTLER_DATA_DIR"),
            max_logs: env::var("BUTLER_MAX_LOGS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(MAX_LOGS),
            detached: env_flag_enabled("BUTLER_DETACHED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/var/lib/butler".to_string()), PathBuf::from("/var/lib/butler"));
        assert_eq!(expand_tilde("relative/dir".to_string()), PathBuf::from("relative/dir"));
    }

    #[test]
    fn default_config_uses_max_logs() {
        let config = Config::default();
        assert_eq!(config.max_logs, 1000);
        assert!(!config.detached);
        assert!(config.config_dir.is_none());
    }
}
