//! Line-oriented text transforms behind Textpad and the rename preview.
//!
//! Every function splits on `\n`, works on the resulting lines and joins them
//! back with `\n`. An empty document is a single empty line. None of them fail.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::app::domain::text_options::{CaseType, TextProcessingOptions};

static NEWLINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline pattern is valid"));

/// Drop every line that is empty or whitespace-only
pub fn remove_empty_lines(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep the first occurrence of each line, in original order.
///
/// Lines are compared exactly: no trimming, case-sensitive.
pub fn remove_duplicate_lines(text: &str) -> String {
    let mut seen = HashSet::new();
    text.split('\n')
        .filter(|line| seen.insert(*line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop every line containing `needle` as a literal, case-sensitive substring.
///
/// An empty needle leaves the text unchanged.
pub fn remove_lines_containing(text: &str, needle: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }

    text.split('\n')
        .filter(|line| !line.contains(needle))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prepend `prefix` to every line, empty lines included
pub fn add_prefix(text: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Insert `suffix` before the extension of every line.
///
/// The extension starts at the last `.` of the line; lines without a dot get
/// the suffix appended at the end.
pub fn add_suffix(text: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| suffix_line(line, suffix))
        .collect::<Vec<_>>()
        .join("\n")
}

fn suffix_line(line: &str, suffix: &str) -> String {
    match line.rfind('.') {
        Some(dot) => format!("{}{}{}", &line[..dot], suffix, &line[dot..]),
        None => format!("{}{}", line, suffix),
    }
}

/// Sort lines by code point; ties keep their relative order
pub fn sort_lines(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    lines.sort();
    lines.join("\n")
}

/// Convert the case of the whole text.
///
/// Title case capitalizes the first character of every word (a word starts at
/// an ASCII letter, digit or underscore and runs to the next Unicode
/// whitespace) and lowercases the rest of it.
pub fn change_case(text: &str, case: CaseType) -> String {
    match case {
        CaseType::Lowercase => text.to_lowercase(),
        CaseType::Uppercase => text.to_uppercase(),
        CaseType::Titlecase => title_case(text),
    }
}

/// Same as [`change_case`] with the case given by name.
///
/// Unknown names leave the text unchanged.
pub fn change_case_named(text: &str, case: &str) -> String {
    match case.parse::<CaseType>() {
        Ok(case) => change_case(text, case),
        Err(_) => text.to_string(),
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_whitespace() {
            in_word = false;
            out.push(c);
        } else if in_word {
            out.extend(c.to_lowercase());
        } else if c.is_ascii_alphanumeric() || c == '_' {
            in_word = true;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Double every line break
pub fn add_line_breaks(text: &str) -> String {
    text.replace('\n', "\n\n")
}

/// Collapse every run of line breaks into a single one
pub fn remove_extra_line_breaks(text: &str) -> String {
    NEWLINE_RUN.replace_all(text, "\n").into_owned()
}

/// Apply case, prefix, suffix and numbering to every line, in that order.
///
/// When `rename_pattern` contains `{n}` the whole line is replaced by the
/// pattern, numbered from `start_number` by line index. Case, prefix and
/// suffix results for that line are discarded.
pub fn process_text_with_options(text: &str, options: &TextProcessingOptions) -> String {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| process_line(line, index, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line of [`process_text_with_options`]; `index` is 0-based.
pub fn process_line(line: &str, index: usize, options: &TextProcessingOptions) -> String {
    if options.has_numbering() {
        return numbered_name(&options.rename_pattern, options.start_number, index);
    }

    let mut processed = match options.case_type {
        Some(case) => change_case(line, case),
        None => line.to_string(),
    };
    if !options.prefix.is_empty() {
        processed.insert_str(0, &options.prefix);
    }
    if !options.suffix.is_empty() {
        processed = suffix_line(&processed, &options.suffix);
    }
    processed
}

/// Substitute the first `{n}` in `pattern` with `start + index`
pub fn numbered_name(pattern: &str, start: i64, index: usize) -> String {
    let number = start.saturating_add(index as i64);
    pattern.replacen(TextProcessingOptions::NUMBER_TOKEN, &number.to_string(), 1)
}

/// A single Textpad action with its argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum TextOperation {
    RemoveEmptyLines,
    RemoveDuplicateLines,
    RemoveLinesContaining { text: String },
    AddPrefix { prefix: String },
    AddSuffix { suffix: String },
    SortLines,
    ChangeCase { case: CaseType },
    AddLineBreaks,
    RemoveExtraLineBreaks,
    Process { options: TextProcessingOptions },
}

impl TextOperation {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::RemoveEmptyLines => remove_empty_lines(text),
            Self::RemoveDuplicateLines => remove_duplicate_lines(text),
            Self::RemoveLinesContaining { text: needle } => remove_lines_containing(text, needle),
            Self::AddPrefix { prefix } => add_prefix(text, prefix),
            Self::AddSuffix { suffix } => add_suffix(text, suffix),
            Self::SortLines => sort_lines(text),
            Self::ChangeCase { case } => change_case(text, *case),
            Self::AddLineBreaks => add_line_breaks(text),
            Self::RemoveExtraLineBreaks => remove_extra_line_breaks(text),
            Self::Process { options } => process_text_with_options(text, options),
        }
    }
}

/// Run `operations` left to right over `text`
pub fn apply_all(text: &str, operations: &[TextOperation]) -> String {
    operations
        .iter()
        .fold(text.to_string(), |acc, op| op.apply(&acc))
}
