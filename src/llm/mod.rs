//! LLM abstraction layer
//!
//! Provider-neutral conversation types and the [`LlmProvider`] trait live in
//! `core`; `claude` implements it against the Anthropic Messages API. The
//! agent loop in `agent` drives a provider and a tool executor from `tools`.

pub mod agent;
pub mod claude;
pub mod core;
pub mod observe;
pub mod tools;

// Re-export commonly used types
pub use agent::{Agent, AgentError, Conversation, ConversationError, InputSource};
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::{
        ContentBlock, ContentDelta, FinishReason, GenerateRequest, Message, MessageRole,
        StreamEvent, ToolCall, ToolDeclaration, ToolResult, UsageMetadata,
    },
};
pub use observe::{AgentEvent, Observer, RecordingObserver, TracingObserver};
pub use tools::{Dispatcher, ToolExecutor, ToolRegistry};
