//! Folds a provider event stream into one complete model response

use crate::llm::core::types::{
    ContentBlockStart, ContentDelta, FinishReason, StreamEvent, ToolCall,
};

use super::error::AgentError;

/// A complete model response
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    /// Text of all text blocks, one block per line
    pub text: String,
    /// Tool calls in emission order
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: FinishReason,
}

/// Helper struct for accumulating partial tool use data
struct PartialToolUseAccumulator {
    id: String,
    name: String,
    input: String,
}

#[derive(Default)]
pub struct ResponseAccumulator {
    text: String,
    tool_calls: Vec<ToolCall>,
    current_tool_use: Option<PartialToolUseAccumulator>,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event, returning the response once the message ends
    pub fn apply(&mut self, event: StreamEvent) -> Result<Option<ModelResponse>, AgentError> {
        match event {
            StreamEvent::ContentBlockStart { block, .. } => match block {
                ContentBlockStart::Text { text } => {
                    if !self.text.is_empty() {
                        self.text.push('\n');
                    }
                    self.text.push_str(&text);
                }
                ContentBlockStart::ToolUse { id, name } => {
                    self.current_tool_use = Some(PartialToolUseAccumulator {
                        id,
                        name,
                        input: String::new(),
                    });
                }
            },
            StreamEvent::ContentDelta { delta, .. } => match delta {
                ContentDelta::TextDelta { text } => self.text.push_str(&text),
                ContentDelta::ToolUseDelta { partial } => {
                    if let Some(tool_use) = &mut self.current_tool_use {
                        tool_use.input.push_str(&partial.partial_json);
                    }
                }
            },
            StreamEvent::ContentBlockEnd { .. } => {
                if let Some(tool_use) = self.current_tool_use.take() {
                    // Tools without parameters stream no input at all
                    let input = if tool_use.input.trim().is_empty() {
                        serde_json::Value::Object(serde_json::Map::new())
                    } else {
                        serde_json::from_str(&tool_use.input)?
                    };
                    self.tool_calls.push(ToolCall {
                        id: tool_use.id,
                        name: tool_use.name,
                        input,
                    });
                }
            }
            StreamEvent::MessageEnd { finish_reason, .. } => {
                return Ok(Some(ModelResponse {
                    text: std::mem::take(&mut self.text),
                    tool_calls: std::mem::take(&mut self.tool_calls),
                    finish_reason,
                }));
            }
            StreamEvent::Error { error } => return Err(AgentError::Stream(error)),
            StreamEvent::MessageStart { .. } | StreamEvent::MessageDelta { .. } => {}
        }
        Ok(None)
    }
}
