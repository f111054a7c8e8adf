//! Shared helpers for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use byoa::llm::core::types::{
    ContentBlockStart, ContentDelta, FinishReason, PartialToolUse, UsageMetadata,
};
use byoa::llm::{EventStream, GenerateRequest, LlmError, LlmProvider, StreamEvent};

/// One scripted backend reply
pub type Reply = Result<Vec<StreamEvent>, LlmError>;

/// Provider that replays scripted replies and records every request
pub struct ScriptedProvider {
    replies: Mutex<Vec<Reply>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Reply>) -> (Self, Arc<Mutex<Vec<GenerateRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let provider = Self {
            replies: Mutex::new(replies),
            requests: Arc::clone(&requests),
        };
        (provider, requests)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.requests.lock().unwrap().push(request);

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(LlmError::StreamError("script exhausted".to_string()));
        }
        let events = replies.remove(0)?;
        Ok(Box::pin(futures::stream::iter(events.into_iter().map(Ok))))
    }
}

fn end(finish_reason: FinishReason) -> StreamEvent {
    StreamEvent::MessageEnd {
        finish_reason,
        usage: UsageMetadata::new(12, 8),
    }
}

/// A reply consisting of a single text block
pub fn text_reply(text: &str) -> Reply {
    Ok(vec![
        StreamEvent::ContentBlockStart {
            index: 0,
            block: ContentBlockStart::Text {
                text: String::new(),
            },
        },
        StreamEvent::ContentDelta {
            index: 0,
            delta: ContentDelta::TextDelta {
                text: text.to_string(),
            },
        },
        StreamEvent::ContentBlockEnd { index: 0 },
        end(FinishReason::EndTurn),
    ])
}

/// A reply requesting one tool call per `(id, name, input)`
pub fn tool_reply(calls: &[(&str, &str, serde_json::Value)]) -> Reply {
    let mut events = Vec::new();
    for (index, (id, name, input)) in calls.iter().enumerate() {
        events.push(StreamEvent::ContentBlockStart {
            index,
            block: ContentBlockStart::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
            },
        });
        events.push(StreamEvent::ContentDelta {
            index,
            delta: ContentDelta::ToolUseDelta {
                partial: PartialToolUse {
                    partial_json: input.to_string(),
                },
            },
        });
        events.push(StreamEvent::ContentBlockEnd { index });
    }
    events.push(end(FinishReason::ToolUse));
    Ok(events)
}

/// Whether ripgrep is installed
pub fn rg_available() -> bool {
    std::process::Command::new("rg")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
