//! Exact-match text replacement and file creation

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::resolve;
use crate::llm::tools::tool::{ToolError, TypedTool};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EditFileInput {
    /// The path to the file
    pub path: String,
    /// Text to search for - must match exactly and must only have one match exactly
    pub old_str: String,
    /// Text to replace old_str with
    pub new_str: String,
}

/// Replaces exactly one occurrence of `old_str`
///
/// Zero or several occurrences leave the file untouched. A missing file is
/// created only when `old_str` is empty.
pub struct EditFile {
    workdir: PathBuf,
}

impl EditFile {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

/// Counts occurrences of `needle`, including ones that overlap
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack
        .char_indices()
        .filter(|(i, _)| haystack[*i..].starts_with(needle))
        .count()
}

async fn create_file(path: &Path, display: &str, content: &str) -> Result<String, ToolError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ToolError::failed(format!("failed to create directory for {}: {}", display, e)))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ToolError::failed(format!("failed to create {}: {}", display, e)))?;

    tracing::info!(path = %path.display(), "created file");
    Ok(format!("Successfully created file {}", display))
}

#[async_trait]
impl TypedTool for EditFile {
    type Input = EditFileInput;

    const NAME: &'static str = "edit_file";
    const DESCRIPTION: &'static str = "Make edits to a text file.

Replaces 'old_str' with 'new_str' in the given file. 'old_str' and 'new_str' MUST be different from each other.

If the file specified with path doesn't exist, it will be created.";

    async fn call(&self, input: EditFileInput) -> Result<String, ToolError> {
        if input.path.is_empty() {
            return Err(ToolError::failed("path is required"));
        }
        if input.old_str == input.new_str {
            return Err(ToolError::failed("old_str and new_str must be different"));
        }

        let path = resolve(&self.workdir, &input.path);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound && input.old_str.is_empty() => {
                return create_file(&path, &input.path, &input.new_str).await;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ToolError::failed(format!("file not found: {}", input.path)));
            }
            Err(e) => {
                return Err(ToolError::failed(format!("failed to read {}: {}", input.path, e)));
            }
        };

        if input.old_str.is_empty() {
            return Err(ToolError::failed(format!(
                "old_str must not be empty when editing existing file {}",
                input.path
            )));
        }

        match count_occurrences(&content, &input.old_str) {
            0 => Err(ToolError::failed(format!("old_str not found in {}", input.path))),
            1 => {
                let updated = content.replacen(&input.old_str, &input.new_str, 1);
                tokio::fs::write(&path, updated)
                    .await
                    .map_err(|e| ToolError::failed(format!("failed to write {}: {}", input.path, e)))?;
                tracing::info!(path = %path.display(), "edited file");
                Ok("OK".to_string())
            }
            n => Err(ToolError::failed(format!(
                "old_str is ambiguous: found {} matches in {}; include more surrounding context",
                n, input.path
            ))),
        }
    }
}
