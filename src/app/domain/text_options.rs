use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::app::infrastructure::error::AppError;

/// Case conversion applied by Textpad and the rename preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Lowercase,
    Uppercase,
    Titlecase,
}

impl CaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::Titlecase => "titlecase",
        }
    }

    /// Label shown in the case picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Lowercase => "Lowercase",
            Self::Uppercase => "Uppercase",
            Self::Titlecase => "Title Case",
        }
    }

    pub fn all() -> &'static [CaseType] {
        &[Self::Lowercase, Self::Uppercase, Self::Titlecase]
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowercase" | "lower" => Ok(Self::Lowercase),
            "uppercase" | "upper" => Ok(Self::Uppercase),
            "titlecase" | "title" => Ok(Self::Titlecase),
            other => Err(AppError::InvalidOption(format!("case type '{}'", other))),
        }
    }
}

/// Options for `process_text_with_options` and the rename preview.
///
/// Field names are camelCase on the wire so the shell can send them unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProcessingOptions {
    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,

    /// Consumed by `remove_lines_containing`; not part of the combined pass.
    #[serde(default)]
    pub remove_text: String,

    /// `None` leaves the case untouched. Unknown names deserialize to `None`.
    #[serde(default, deserialize_with = "lenient_case_type")]
    pub case_type: Option<CaseType>,

    #[serde(default = "default_start_number")]
    pub start_number: i64,

    #[serde(default)]
    pub rename_pattern: String,
}

fn default_start_number() -> i64 {
    1
}

fn lenient_case_type<'de, D>(deserializer: D) -> Result<Option<CaseType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|name| name.parse().ok()))
}

impl Default for TextProcessingOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            remove_text: String::new(),
            case_type: None,
            start_number: default_start_number(),
            rename_pattern: String::new(),
        }
    }
}

impl TextProcessingOptions {
    /// Token replaced by the running number in `rename_pattern`
    pub const NUMBER_TOKEN: &'static str = "{n}";

    pub fn has_numbering(&self) -> bool {
        self.rename_pattern.contains(Self::NUMBER_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TextProcessingOptions::default();
        assert_eq!(options.start_number, 1);
        assert_eq!(options.case_type, None);
        assert!(options.prefix.is_empty());
        assert!(!options.has_numbering());
    }

    #[test]
    fn test_case_type_parse() {
        assert_eq!("lowercase".parse::<CaseType>().unwrap(), CaseType::Lowercase);
        assert_eq!(" UPPER ".parse::<CaseType>().unwrap(), CaseType::Uppercase);
        assert_eq!("Title".parse::<CaseType>().unwrap(), CaseType::Titlecase);
        assert!(matches!("camel".parse::<CaseType>(), Err(AppError::InvalidOption(_))));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = r#"{"prefix":"a_","caseType":"uppercase","startNumber":5,"renamePattern":"file_{n}"}"#;
        let options: TextProcessingOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.prefix, "a_");
        assert_eq!(options.case_type, Some(CaseType::Uppercase));
        assert_eq!(options.start_number, 5);
        assert!(options.has_numbering());
        assert!(options.suffix.is_empty());
    }

    #[test]
    fn test_unknown_case_type_is_ignored() {
        let json = r#"{"caseType":"sponge"}"#;
        let options: TextProcessingOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.case_type, None);
        assert_eq!(options.start_number, 1);
    }

    #[test]
    fn test_case_type_serialization() {
        let options = TextProcessingOptions {
            case_type: Some(CaseType::Titlecase),
            ..Default::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"caseType\":\"titlecase\""));
    }
}
