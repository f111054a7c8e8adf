//! Code search backed by ripgrep

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::process::Command;

use super::{truncate_lines, MAX_OUTPUT_LINES};
use crate::llm::tools::tool::{ToolError, TypedTool};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CodeSearchInput {
    /// The search pattern or regex to look for
    pub pattern: String,
    /// Optional path to search in (file or directory)
    #[serde(default)]
    pub path: Option<String>,
    /// Optional file extension to limit search to (e.g., 'go', 'js', 'py')
    #[serde(default)]
    pub file_type: Option<String>,
    /// Whether the search should be case sensitive (default: false)
    #[serde(default)]
    pub case_sensitive: bool,
}

pub struct CodeSearch {
    workdir: PathBuf,
}

impl CodeSearch {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

/// ripgrep arguments for a search, without the program name
fn build_args(input: &CodeSearchInput) -> Vec<String> {
    let mut args: Vec<String> = ["--line-number", "--with-filename", "--color=never"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    if !input.case_sensitive {
        args.push("--ignore-case".to_string());
    }
    if let Some(file_type) = non_empty(&input.file_type) {
        args.push("--type".to_string());
        args.push(file_type.to_string());
    }

    // Patterns and paths may start with '-'
    args.push("--regexp".to_string());
    args.push(input.pattern.clone());
    args.push("--".to_string());
    args.push(non_empty(&input.path).unwrap_or(".").to_string());
    args
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Map ripgrep's exit code and output to a tool outcome
///
/// Exit code 1 means "no matches" and is not a failure.
fn interpret_output(code: Option<i32>, stdout: &str, stderr: &str) -> Result<String, ToolError> {
    match code {
        Some(0) => {
            let matches = stdout.trim();
            tracing::debug!(matches = matches.lines().count(), "search completed");
            Ok(truncate_lines(matches, MAX_OUTPUT_LINES, "matches"))
        }
        Some(1) => Ok("No matches found".to_string()),
        Some(code) => Err(ToolError::failed(format!(
            "search failed: exit status {}: {}",
            code,
            stderr.trim()
        ))),
        None => Err(ToolError::failed("search failed: rg terminated by signal")),
    }
}

#[async_trait]
impl TypedTool for CodeSearch {
    type Input = CodeSearchInput;

    const NAME: &'static str = "code_search";
    const DESCRIPTION: &'static str = "Search for code patterns using ripgrep (rg).

Use this to find code patterns, function definitions, variable usage, or any text in the codebase.
You can search by pattern, file type, or directory.";

    async fn call(&self, input: CodeSearchInput) -> Result<String, ToolError> {
        if input.pattern.is_empty() {
            return Err(ToolError::failed("pattern is required"));
        }

        let args = build_args(&input);
        tracing::info!(pattern = %input.pattern, ?args, "searching code");

        let output = Command::new("rg")
            .args(&args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ToolError::failed(format!("search failed: {}", e)))?;

        interpret_output(
            output.status.code(),
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )
    }
}
