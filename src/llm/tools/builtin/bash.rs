//! Shell command execution

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::process::Command;

use super::{truncate_lines, MAX_OUTPUT_LINES};
use crate::llm::tools::tool::{ToolError, TypedTool};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BashInput {
    /// The bash command to execute.
    pub command: String,
}

/// Runs `bash -c <command>` in the working directory
///
/// A command that runs but exits non-zero is still a successful tool call:
/// the model gets the exit status and output and decides what to do next.
/// Only a failure to spawn `bash` at all is a tool error.
pub struct Bash {
    workdir: PathBuf,
}

impl Bash {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl TypedTool for Bash {
    type Input = BashInput;

    const NAME: &'static str = "bash";
    const DESCRIPTION: &'static str =
        "Execute a bash command and return its output. Use this to run shell commands.";

    async fn call(&self, input: BashInput) -> Result<String, ToolError> {
        tracing::info!(command = %input.command, "executing bash command");

        let output = Command::new("bash")
            .arg("-c")
            .arg(&input.command)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ToolError::failed(format!("Failed to run bash: {}", e)))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            tracing::warn!(status = %output.status, "bash command failed");
            let report = format!(
                "Command failed with error: {}\nOutput: {}",
                describe_status(output.status),
                combined
            );
            return Ok(truncate_lines(&report, MAX_OUTPUT_LINES, "lines"));
        }

        tracing::debug!(bytes = combined.len(), "bash command succeeded");
        Ok(truncate_lines(combined.trim(), MAX_OUTPUT_LINES, "lines"))
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => status.to_string(),
    }
}
