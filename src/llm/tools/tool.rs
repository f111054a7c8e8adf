//! The polymorphic tool interface and the typed-input adapter

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::declaration::create_tool_declaration;
use crate::llm::core::types::ToolDeclaration;

/// Conditions under which a tool cannot produce output at all
///
/// Both variants become error tool results; neither is fatal to the agent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Arguments did not match the declared input shape
    #[error("Invalid arguments: {0}")]
    InvalidInput(String),

    /// The tool understood the request but could not carry it out
    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    pub fn failed(message: impl Into<String>) -> Self {
        ToolError::Failed(message.into())
    }
}

/// A capability the model can invoke by name
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema shown to the model
    fn declaration(&self) -> &ToolDeclaration;

    /// Run the tool against raw, not yet validated arguments
    async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError>;

    fn name(&self) -> &str {
        &self.declaration().name
    }
}

/// A tool with a strongly typed input record
///
/// Register implementations with
/// [`ToolRegistry::register_typed`](super::registry::ToolRegistry::register_typed);
/// the registry derives the schema from `Input` and validates raw arguments
/// by deserializing them before `call` runs.
#[async_trait]
pub trait TypedTool: Send + Sync + 'static {
    type Input: DeserializeOwned + JsonSchema + Send;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    async fn call(&self, input: Self::Input) -> Result<String, ToolError>;
}

/// Adapts a [`TypedTool`] to the dynamic [`Tool`] interface
pub struct TypedToolAdapter<T: TypedTool> {
    inner: T,
    declaration: ToolDeclaration,
}

impl<T: TypedTool> TypedToolAdapter<T> {
    /// Wrap `inner`, generating its declaration
    ///
    /// # Errors
    ///
    /// Fails if the input schema cannot be generated.
    pub fn new(inner: T) -> Result<Self, serde_json::Error> {
        let declaration = create_tool_declaration::<T::Input>(T::NAME, T::DESCRIPTION)?;
        Ok(Self { inner, declaration })
    }
}

#[async_trait]
impl<T: TypedTool> Tool for TypedToolAdapter<T> {
    fn declaration(&self) -> &ToolDeclaration {
        &self.declaration
    }

    async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError> {
        let input = serde_json::from_value::<T::Input>(input)
            .map_err(|e| ToolError::InvalidInput(e.to_string()))?;
        self.inner.call(input).await
    }
}
