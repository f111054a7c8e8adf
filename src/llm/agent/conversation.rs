//! Append-only conversation history

use thiserror::Error;

use crate::llm::core::types::{Message, MessageRole, ToolResult};

/// A turn that would break the request/result pairing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// Tool results with no assistant tool calls right before them
    #[error("tool results without a preceding tool call")]
    NoPendingToolCalls,

    /// Results do not answer exactly the pending calls, in order
    #[error("tool results {found:?} do not match tool calls {expected:?}")]
    MismatchedToolResults {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A new turn was added while tool calls were still unanswered
    #[error("tool calls {0:?} have no results")]
    UnresolvedToolCalls(Vec<String>),

    /// `push_assistant` was given a message from another role
    #[error("expected an assistant message, got {0:?}")]
    WrongRole(MessageRole),
}

/// Ordered turns replayed to the model on every request
///
/// Turns are never edited or removed. Every assistant turn that carries tool
/// calls is followed by exactly one tool-result turn answering each call by
/// id, in emission order.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Result<(), ConversationError> {
        self.ensure_resolved()?;
        self.messages.push(Message::user(text));
        Ok(())
    }

    pub fn push_assistant(&mut self, message: Message) -> Result<(), ConversationError> {
        if message.role != MessageRole::Assistant {
            return Err(ConversationError::WrongRole(message.role));
        }
        self.ensure_resolved()?;
        self.messages.push(message);
        Ok(())
    }

    /// Append the results answering the last assistant turn's tool calls
    pub fn push_tool_results(&mut self, results: Vec<ToolResult>) -> Result<(), ConversationError> {
        let expected = self.pending_tool_call_ids();
        if expected.is_empty() {
            return Err(ConversationError::NoPendingToolCalls);
        }

        let found: Vec<String> = results.iter().map(|r| r.tool_use_id.clone()).collect();
        if found != expected {
            return Err(ConversationError::MismatchedToolResults { expected, found });
        }

        self.messages.push(Message::tool_results(results));
        Ok(())
    }

    /// Ids of tool calls in the last turn, if it is an assistant turn
    fn pending_tool_call_ids(&self) -> Vec<String> {
        match self.messages.last() {
            Some(message) if message.role == MessageRole::Assistant => {
                message.tool_calls().map(|call| call.id).collect()
            }
            _ => Vec::new(),
        }
    }

    fn ensure_resolved(&self) -> Result<(), ConversationError> {
        let pending = self.pending_tool_call_ids();
        if pending.is_empty() {
            Ok(())
        } else {
            Err(ConversationError::UnresolvedToolCalls(pending))
        }
    }
}
