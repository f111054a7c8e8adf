use crate::llm::core::error::LlmError;

use super::conversation::ConversationError;

/// Errors that can occur during agent execution
///
/// Everything except [`AgentError::Conversation`] and [`AgentError::Input`]
/// describes a failed model request: the agent reports it and waits for the
/// next user input.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Error from the LLM provider
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The provider reported an error inside the event stream
    #[error("Stream error: {0}")]
    Stream(String),

    /// Failed to parse tool input JSON
    #[error("Failed to parse tool input: {0}")]
    ToolInputParse(#[from] serde_json::Error),

    /// LLM stream ended before the response was complete
    #[error("Stream ended unexpectedly")]
    UnexpectedStreamEnd,

    /// A turn would have broken the conversation's ordering rules
    #[error("Conversation error: {0}")]
    Conversation(#[from] ConversationError),

    /// Reading user input failed
    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),
}

impl AgentError {
    /// Whether the loop can carry on with the next user input
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AgentError::Conversation(_) | AgentError::Input(_))
    }
}
