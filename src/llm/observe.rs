//! Observability handle shared by the agent loop and the tool executor
//!
//! Components receive an `Arc<dyn Observer>` at construction instead of
//! logging to global state, so tests can swap in a [`RecordingObserver`].

use std::sync::{Arc, Mutex};

use crate::llm::core::types::ToolResult;

/// Events emitted by the agent during execution
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Agent is about to read the next line of user input
    AwaitingInput,

    /// Agent is calling the model (1-based within one user turn)
    IterationStarted { iteration: usize },

    /// The model produced text
    AssistantText { text: String },

    /// Agent is executing a tool call
    ToolExecutionStarted {
        tool_use_id: String,
        name: String,
        input: serde_json::Value,
    },

    /// Tool execution finished; `result.is_error` marks dispatch-level failures
    ToolExecutionCompleted { name: String, result: ToolResult },

    /// The executor refused a call before running any tool
    ToolRejected {
        tool_use_id: String,
        name: String,
        reason: String,
    },

    /// The model call failed; no turn was recorded for it
    BackendFailed { error: String },

    /// The per-turn model request budget ran out
    IterationLimitReached { limit: usize },

    /// Agent loop completed (final response with no tool calls)
    Completed,
}

/// Receives agent events
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &AgentEvent);
}

/// Writes events to the `tracing` log stream
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&self, event: &AgentEvent) {
        match event {
            AgentEvent::AwaitingInput => tracing::trace!("waiting for user input"),
            AgentEvent::IterationStarted { iteration } => {
                tracing::debug!(iteration, "requesting model response");
            }
            AgentEvent::AssistantText { text } => {
                tracing::debug!(chars = text.len(), "assistant text");
            }
            AgentEvent::ToolExecutionStarted {
                tool_use_id,
                name,
                input,
            } => {
                tracing::info!(tool = %name, id = %tool_use_id, input = %input, "executing tool");
            }
            AgentEvent::ToolExecutionCompleted { name, result } if result.is_error => {
                tracing::warn!(tool = %name, id = %result.tool_use_id, error = %result.content, "tool call failed");
            }
            AgentEvent::ToolExecutionCompleted { name, result } => {
                tracing::info!(tool = %name, id = %result.tool_use_id, bytes = result.content.len(), "tool call completed");
            }
            AgentEvent::ToolRejected {
                tool_use_id,
                name,
                reason,
            } => {
                tracing::warn!(tool = %name, id = %tool_use_id, %reason, "tool call rejected");
            }
            AgentEvent::BackendFailed { error } => {
                tracing::error!(%error, "model request failed");
            }
            AgentEvent::IterationLimitReached { limit } => {
                tracing::warn!(limit, "model request limit reached for this turn");
            }
            AgentEvent::Completed => tracing::debug!("turn completed"),
        }
    }
}

/// Captures events in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<AgentEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<AgentEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Observer for RecordingObserver {
    fn on_event(&self, event: &AgentEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Forwards every event to each inner observer in order
pub struct Fanout(pub Vec<Arc<dyn Observer>>);

impl Observer for Fanout {
    fn on_event(&self, event: &AgentEvent) {
        for observer in &self.0 {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_keeps_order() {
        let recorder = RecordingObserver::new();
        recorder.on_event(&AgentEvent::IterationStarted { iteration: 1 });
        recorder.on_event(&AgentEvent::Completed);

        assert_eq!(
            recorder.events(),
            vec![AgentEvent::IterationStarted { iteration: 1 }, AgentEvent::Completed]
        );
    }

    #[test]
    fn test_fanout_reaches_every_observer() {
        let a = RecordingObserver::new();
        let b = RecordingObserver::new();
        let observers: Vec<Arc<dyn Observer>> = vec![a.clone(), b.clone(), Arc::new(TracingObserver)];
        let fanout = Fanout(observers);

        fanout.on_event(&AgentEvent::BackendFailed {
            error: "boom".to_string(),
        });

        assert_eq!(a.events().len(), 1);
        assert_eq!(a.events(), b.events());
    }
}
