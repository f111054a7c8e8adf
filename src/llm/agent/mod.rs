//! Agent orchestration loop
//!
//! The agent:
//! - Keeps the conversation history in memory
//! - Sends the full history and tool declarations on every model request
//! - Executes tool calls in emission order and answers them in one turn
//! - Loops until the model answers without tool calls, or the per-turn
//!   request budget runs out
//! - Reports every step to its [`Observer`]

mod accumulator;
mod conversation;
mod error;
mod input;

pub use accumulator::{ModelResponse, ResponseAccumulator};
pub use conversation::{Conversation, ConversationError};
pub use error::AgentError;
pub use input::{InputSource, ScriptedInput, StdinInput};

use std::sync::Arc;

use async_stream::stream;
use futures::stream::Stream;
use futures::StreamExt;
use pin_utils::pin_mut;

use crate::llm::core::{
    config::GenerationConfig,
    provider::LlmProvider,
    types::{GenerateRequest, Message, ToolDeclaration},
};
use crate::llm::observe::{AgentEvent, Observer, TracingObserver};
use crate::llm::tools::executor::ToolExecutor;

/// Model requests allowed per user turn unless configured otherwise
pub const DEFAULT_MAX_ITERATIONS: usize = 25;

/// Tool-using conversational agent
pub struct Agent {
    /// LLM provider
    provider: Box<dyn LlmProvider>,

    /// Tool executor for handling function calls
    tool_executor: Box<dyn ToolExecutor>,

    /// Tool declarations available to the LLM
    tool_declarations: Vec<ToolDeclaration>,

    /// Conversation history (kept in memory)
    conversation: Conversation,

    /// Generation configuration (model, max_tokens, etc.)
    config: GenerationConfig,

    /// System prompt (optional)
    system: Option<String>,

    /// Maximum number of model requests per user turn
    max_iterations: usize,

    observer: Arc<dyn Observer>,
}

impl Agent {
    /// Create a new agent with default settings
    pub fn new(
        provider: Box<dyn LlmProvider>,
        tool_executor: Box<dyn ToolExecutor>,
        tool_declarations: Vec<ToolDeclaration>,
        config: GenerationConfig,
        system: Option<String>,
    ) -> Self {
        Self {
            provider,
            tool_executor,
            tool_declarations,
            conversation: Conversation::new(),
            config,
            system,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Set the maximum number of model requests per user turn (at least 1)
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Replace the default `tracing` observer
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Get the full conversation history
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Read user input until it is exhausted, running one turn per line
    ///
    /// Blank lines are skipped. A failed model request is reported to the
    /// observer and the loop goes back to reading input.
    ///
    /// # Errors
    ///
    /// Fails if reading input fails or the conversation would become
    /// inconsistent; end of input is a clean return.
    pub async fn run(&mut self, input: &mut dyn InputSource) -> Result<(), AgentError> {
        let observer = Arc::clone(&self.observer);

        loop {
            observer.on_event(&AgentEvent::AwaitingInput);
            let Some(line) = input.next_line().await? else {
                tracing::debug!("input exhausted");
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            let events = self.turn(line);
            pin_mut!(events);

            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => observer.on_event(&event),
                    Err(e) if e.is_recoverable() => {
                        observer.on_event(&AgentEvent::BackendFailed {
                            error: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    /// Process one user message through the agent loop
    ///
    /// The returned stream emits:
    /// - IterationStarted events when calling the LLM
    /// - AssistantText for any text in a response
    /// - ToolExecution* events when executing tools
    /// - Completed when the model answers without tool calls
    ///
    /// A failed model request ends the stream with an error and leaves no
    /// turn behind for that request.
    pub fn turn(
        &mut self,
        user_message: impl Into<String>,
    ) -> impl Stream<Item = Result<AgentEvent, AgentError>> + Send + '_ {
        let user_message = user_message.into();

        stream! {
            if let Err(e) = self.conversation.push_user(user_message) {
                yield Err(AgentError::from(e));
                return;
            }

            let mut iteration = 0;

            loop {
                if iteration == self.max_iterations {
                    let note = format!(
                        "[stopped after {} model requests without a final answer]",
                        iteration
                    );
                    if let Err(e) = self.conversation.push_assistant(Message::assistant(note.clone())) {
                        yield Err(AgentError::from(e));
                        return;
                    }
                    yield Ok(AgentEvent::IterationLimitReached { limit: self.max_iterations });
                    yield Ok(AgentEvent::AssistantText { text: note });
                    return;
                }

                iteration += 1;
                yield Ok(AgentEvent::IterationStarted { iteration });

                let response = match self.request_response().await {
                    Ok(response) => response,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                if !response.text.is_empty() {
                    yield Ok(AgentEvent::AssistantText { text: response.text.clone() });
                }

                // No tools - we're done
                if response.tool_calls.is_empty() {
                    if !response.text.is_empty() {
                        if let Err(e) = self.conversation.push_assistant(Message::assistant(response.text)) {
                            yield Err(AgentError::from(e));
                            return;
                        }
                    }
                    yield Ok(AgentEvent::Completed);
                    return;
                }

                let calls = response.tool_calls;
                let assistant = Message::assistant_with_tool_calls(Some(response.text), calls.clone());
                if let Err(e) = self.conversation.push_assistant(assistant) {
                    yield Err(AgentError::from(e));
                    return;
                }

                let mut results = Vec::with_capacity(calls.len());
                for call in &calls {
                    yield Ok(AgentEvent::ToolExecutionStarted {
                        tool_use_id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.input.clone(),
                    });

                    let result = self.tool_executor.execute(call).await;

                    yield Ok(AgentEvent::ToolExecutionCompleted {
                        name: call.name.clone(),
                        result: result.clone(),
                    });
                    results.push(result);
                }

                if let Err(e) = self.conversation.push_tool_results(results) {
                    yield Err(AgentError::from(e));
                    return;
                }

                // Loop continues - next iteration will call LLM again
            }
        }
    }

    /// Send the current history and fold the streamed reply
    async fn request_response(&self) -> Result<ModelResponse, AgentError> {
        let request = GenerateRequest {
            messages: self.conversation.messages().to_vec(),
            tools: Some(self.tool_declarations.clone()),
            config: self.config.clone(),
            system: self.system.clone(),
        };

        let mut events = self.provider.stream_generate(request).await?;
        let mut accumulator = ResponseAccumulator::new();

        while let Some(event) = events.next().await {
            if let Some(response) = accumulator.apply(event?)? {
                tracing::debug!(
                    finish_reason = ?response.finish_reason,
                    tool_calls = response.tool_calls.len(),
                    "model response complete"
                );
                return Ok(response);
            }
        }

        Err(AgentError::UnexpectedStreamEnd)
    }
}
