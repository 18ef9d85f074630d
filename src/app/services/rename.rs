//! Bulk-rename preview. Nothing here touches the file system.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::app::domain::text_options::TextProcessingOptions;
use crate::app::services::text_ops::process_line;

/// Shown instead of a preview when no file is selected
pub const NO_FILES_MESSAGE: &str = "No files selected for preview";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: u64,
}

impl FileInfo {
    /// Describe `path` without reading it; the name is its last component
    pub fn from_path(path: &str) -> Self {
        Self {
            name: extract_filename(path),
            path: path.to_string(),
            size: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenamePreview {
    pub original: String,
    pub renamed: String,
}

/// Compute the new name of every file; a file's position is its number index
pub fn preview(files: &[FileInfo], options: &TextProcessingOptions) -> Vec<RenamePreview> {
    files
        .iter()
        .enumerate()
        .map(|(index, file)| RenamePreview {
            original: file.name.clone(),
            renamed: process_line(&file.name, index, options),
        })
        .collect()
}

/// `original → renamed` per line, or [`NO_FILES_MESSAGE`]
pub fn render_preview(previews: &[RenamePreview]) -> String {
    if previews.is_empty() {
        return NO_FILES_MESSAGE.to_string();
    }

    previews
        .iter()
        .map(|p| format!("{} → {}", p.original, p.renamed))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
