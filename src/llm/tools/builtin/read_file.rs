//! Whole-file reads

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::resolve;
use crate::llm::tools::tool::{ToolError, TypedTool};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileInput {
    /// The relative path of a file in the working directory.
    pub path: String,
}

pub struct ReadFile {
    workdir: PathBuf,
}

impl ReadFile {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl TypedTool for ReadFile {
    type Input = ReadFileInput;

    const NAME: &'static str = "read_file";
    const DESCRIPTION: &'static str = "Read the contents of a given relative file path. Use this when you want to see what's inside a file. Do not use this with directory names.";

    async fn call(&self, input: ReadFileInput) -> Result<String, ToolError> {
        let path = resolve(&self.workdir, &input.path);
        tracing::debug!(path = %path.display(), "reading file");

        tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ToolError::failed(format!("file not found: {}", input.path)),
            _ => ToolError::failed(format!("failed to read {}: {}", input.path, e)),
        })
    }
}
