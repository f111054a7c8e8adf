//! Recursive directory listing

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};

use super::{resolve, truncate_lines, MAX_OUTPUT_LINES};
use crate::llm::tools::tool::{ToolError, TypedTool};

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &[".git", "target"];

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListFilesInput {
    /// Optional relative path to list files from. Defaults to current directory if not provided.
    #[serde(default)]
    pub path: Option<String>,
}

pub struct ListFiles {
    workdir: PathBuf,
}

impl ListFiles {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Sorted entries below `root`, relative to it, directories suffixed with `/`
fn walk(root: &Path) -> Result<Vec<String>, walkdir::Error> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
    {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let mut name = relative.to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    Ok(entries)
}

#[async_trait]
impl TypedTool for ListFiles {
    type Input = ListFilesInput;

    const NAME: &'static str = "list_files";
    const DESCRIPTION: &'static str = "List files and directories at a given path. If no path is provided, lists files in the current directory.";

    async fn call(&self, input: ListFilesInput) -> Result<String, ToolError> {
        let requested = input.path.filter(|p| !p.is_empty()).unwrap_or_else(|| ".".to_string());
        let root = resolve(&self.workdir, &requested);

        if !root.exists() {
            return Err(ToolError::failed(format!("path not found: {}", requested)));
        }
        if !root.is_dir() {
            return Err(ToolError::failed(format!("not a directory: {}", requested)));
        }

        let listing = tokio::task::spawn_blocking(move || walk(&root))
            .await
            .map_err(|e| ToolError::failed(format!("listing task failed: {}", e)))?
            .map_err(|e| ToolError::failed(format!("failed to list {}: {}", requested, e)))?;

        tracing::debug!(entries = listing.len(), "listed files");
        Ok(truncate_lines(&listing.join("\n"), MAX_OUTPUT_LINES, "entries"))
    }
}
