//! Tool executor trait and the registry-backed dispatcher

use std::sync::Arc;

use async_trait::async_trait;

use super::registry::ToolRegistry;
use super::tool::ToolError;
use crate::llm::core::types::{ToolCall, ToolResult};
use crate::llm::observe::{AgentEvent, Observer};

/// Trait for executing tool calls from the LLM
///
/// Implementations never fail: every outcome, including an unknown tool name
/// or malformed arguments, is folded into the returned [`ToolResult`] so the
/// model can see it and recover.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a single tool call and correlate the outcome by id
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}

/// Executes calls against a [`ToolRegistry`]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    observer: Arc<dyn Observer>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, observer: Arc<dyn Observer>) -> Self {
        Self { registry, observer }
    }

    fn reject(&self, call: &ToolCall, reason: String) -> ToolResult {
        self.observer.on_event(&AgentEvent::ToolRejected {
            tool_use_id: call.id.clone(),
            name: call.name.clone(),
            reason: reason.clone(),
        });
        ToolResult::error(&call.id, reason)
    }
}

#[async_trait]
impl ToolExecutor for Dispatcher {
    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.registry.get(&call.name) else {
            return self.reject(call, format!("Unknown tool: {}", call.name));
        };

        match tool.execute(call.input.clone()).await {
            Ok(output) => ToolResult::success(&call.id, output),
            Err(err @ ToolError::InvalidInput(_)) => self.reject(call, err.to_string()),
            Err(ToolError::Failed(message)) => ToolResult::error(&call.id, message),
        }
    }
}
