use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single setting value. The document only ever holds these three shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Interpret command-line text: booleans and numbers first, text otherwise
    pub fn parse_loose(raw: &str) -> Self {
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(int) = raw.parse::<i64>() {
            return Self::Number(int.into());
        }
        if let Some(number) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Self::Number(number);
        }
        Self::Text(raw.to_string())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The whole persisted settings file: a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument(BTreeMap<String, SettingValue>);

impl SettingsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    /// Insert or replace one key, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Option<SettingValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.0.iter()
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(SettingValue::as_bool).unwrap_or(default)
    }

    fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(SettingValue::as_i64).unwrap_or(default)
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(SettingValue::as_str)
            .unwrap_or(default)
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    Auto,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Auto => "Auto (System)",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Typed view over the settings document used by the settings panel.
///
/// Each field falls back to its default on its own when the key is missing or
/// holds the wrong kind of value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: ThemeMode,
    pub language: String,
    pub notifications: bool,
    pub email_notifications: bool,
    pub auto_save: bool,
    /// Minutes between automatic saves
    pub auto_save_interval: i64,
    pub privacy_mode: bool,
    pub data_collection: bool,
    pub username: String,
    pub display_name: String,
    pub bio: String,
}

fn default_theme() -> ThemeMode {
    ThemeMode::Auto
}

fn default_language() -> &'static str {
    "en"
}

fn default_auto_save_interval() -> i64 {
    5
}

fn default_username() -> &'static str {
    "user@example.com"
}

fn default_display_name() -> &'static str {
    "John Doe"
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language().to_string(),
            notifications: true,
            email_notifications: false,
            auto_save: true,
            auto_save_interval: default_auto_save_interval(),
            privacy_mode: false,
            data_collection: true,
            username: default_username().to_string(),
            display_name: default_display_name().to_string(),
            bio: String::new(),
        }
    }
}

impl Settings {
    /// Overlay the stored document on the defaults
    pub fn from_document(doc: &SettingsDocument) -> Self {
        let defaults = Self::default();
        Self {
            theme: doc
                .get("theme")
                .and_then(SettingValue::as_str)
                .and_then(ThemeMode::parse)
                .unwrap_or(defaults.theme),
            language: doc.string_or("language", &defaults.language),
            notifications: doc.bool_or("notifications", defaults.notifications),
            email_notifications: doc.bool_or("emailNotifications", defaults.email_notifications),
            auto_save: doc.bool_or("autoSave", defaults.auto_save),
            auto_save_interval: doc.i64_or("autoSaveInterval", defaults.auto_save_interval),
            privacy_mode: doc.bool_or("privacyMode", defaults.privacy_mode),
            data_collection: doc.bool_or("dataCollection", defaults.data_collection),
            username: doc.string_or("username", &defaults.username),
            display_name: doc.string_or("displayName", &defaults.display_name),
            bio: doc.string_or("bio", &defaults.bio),
        }
    }

    /// Write every field into `doc`, leaving unrelated keys alone
    pub fn merge_into(&self, doc: &mut SettingsDocument) {
        doc.set("theme", self.theme.as_str());
        doc.set("language", self.language.as_str());
        doc.set("notifications", self.notifications);
        doc.set("emailNotifications", self.email_notifications);
        doc.set("autoSave", self.auto_save);
        doc.set("autoSaveInterval", self.auto_save_interval);
        doc.set("privacyMode", self.privacy_mode);
        doc.set("dataCollection", self.data_collection);
        doc.set("username", self.username.as_str());
        doc.set("displayName", self.display_name.as_str());
        doc.set("bio", self.bio.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeMode::Auto);
        assert_eq!(settings.language, "en");
        assert!(settings.notifications);
        assert!(!settings.email_notifications);
        assert_eq!(settings.auto_save_interval, 5);
        assert_eq!(settings.username, "user@example.com");
        assert!(settings.bio.is_empty());
    }

    #[test]
    fn test_document_accepts_flat_values() {
        let json = r#"{"theme":"dark","autoSave":false,"autoSaveInterval":10,"ratio":0.5}"#;
        let doc: SettingsDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.get("theme"), Some(&SettingValue::Text("dark".to_string())));
        assert_eq!(doc.get("autoSave"), Some(&SettingValue::Bool(false)));
        assert_eq!(doc.get("autoSaveInterval").and_then(SettingValue::as_i64), Some(10));
    }

    #[test]
    fn test_document_rejects_nested_values() {
        assert!(serde_json::from_str::<SettingsDocument>(r#"{"a":[1,2]}"#).is_err());
        assert!(serde_json::from_str::<SettingsDocument>(r#"{"a":{"b":1}}"#).is_err());
        assert!(serde_json::from_str::<SettingsDocument>("[]").is_err());
    }

    #[test]
    fn test_partial_document() {
        let mut doc = SettingsDocument::new();
        doc.set("theme", "light");
        doc.set("username", "ada@example.com");

        let settings = Settings::from_document(&doc);
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.username, "ada@example.com");
        assert_eq!(settings.language, "en");
        assert!(settings.data_collection);
    }

    #[test]
    fn test_mistyped_keys_fall_back() {
        let mut doc = SettingsDocument::new();
        doc.set("notifications", "yes");
        doc.set("theme", "solarized");
        doc.set("autoSaveInterval", true);

        let settings = Settings::from_document(&doc);
        assert!(settings.notifications);
        assert_eq!(settings.theme, ThemeMode::Auto);
        assert_eq!(settings.auto_save_interval, 5);
    }

    #[test]
    fn test_merge_into_keeps_unknown_keys() {
        let mut doc = SettingsDocument::new();
        doc.set("windowWidth", 1200_i64);
        let settings = Settings {
            theme: ThemeMode::Dark,
            ..Default::default()
        };
        settings.merge_into(&mut doc);

        assert_eq!(doc.get("windowWidth").and_then(SettingValue::as_i64), Some(1200));
        assert_eq!(Settings::from_document(&doc), settings);
    }

    #[test]
    fn test_parse_loose() {
        assert_eq!(SettingValue::parse_loose("true"), SettingValue::Bool(true));
        assert_eq!(SettingValue::parse_loose("42").as_i64(), Some(42));
        assert!(matches!(SettingValue::parse_loose("1.5"), SettingValue::Number(_)));
        assert_eq!(SettingValue::parse_loose("dark"), SettingValue::Text("dark".to_string()));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(SettingValue::Bool(false).to_string(), "false");
        assert_eq!(SettingValue::from(7_i64).to_string(), "7");
        assert_eq!(SettingValue::from("fr").to_string(), "fr");
    }
}
