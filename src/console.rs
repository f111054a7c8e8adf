//! Terminal rendering of agent events
//!
//! stdout carries only the conversation: the input prompt, assistant text,
//! one trace line per tool call and backend failures. Diagnostics go through
//! `tracing` to stderr.

use std::io::{self, Stdout, Write};
use std::sync::Mutex;

use crate::llm::observe::{AgentEvent, Observer};

const BLUE: &str = "\u{1b}[94m";
const YELLOW: &str = "\u{1b}[93m";
const GREEN: &str = "\u{1b}[92m";
const RED: &str = "\u{1b}[91m";
const RESET: &str = "\u{1b}[0m";

/// Observer that writes the conversation to a terminal
pub struct Console<W: Write + Send> {
    out: Mutex<W>,
    color: bool,
}

impl Console<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), true)
    }
}

impl<W: Write + Send> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn label(&self, color: &'static str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn render(&self, event: &AgentEvent) -> Option<String> {
        match event {
            AgentEvent::AwaitingInput => Some(format!("{}: ", self.label(BLUE, "You"))),
            AgentEvent::AssistantText { text } => {
                Some(format!("{}: {}\n", self.label(YELLOW, "Claude"), text))
            }
            AgentEvent::ToolExecutionStarted { name, input, .. } => {
                Some(format!("{}: {}({})\n", self.label(GREEN, "tool"), name, input))
            }
            AgentEvent::BackendFailed { error } => {
                Some(format!("{}: {}\n", self.label(RED, "Error"), error))
            }
            _ => None,
        }
    }
}

impl<W: Write + Send> Observer for Console<W> {
    fn on_event(&self, event: &AgentEvent) {
        let Some(text) = self.render(event) else {
            return;
        };
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "failed to write to console");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(events: &[AgentEvent], color: bool) -> String {
        let console = Console::new(Vec::new(), color);
        for event in events {
            console.on_event(event);
        }
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_transcript() {
        let output = rendered(
            &[
                AgentEvent::AwaitingInput,
                AgentEvent::IterationStarted { iteration: 1 },
                AgentEvent::ToolExecutionStarted {
                    tool_use_id: "toolu_1".to_string(),
                    name: "bash".to_string(),
                    input: serde_json::json!({"command": "echo hello"}),
                },
                AgentEvent::AssistantText {
                    text: "It printed hello.".to_string(),
                },
                AgentEvent::Completed,
                AgentEvent::BackendFailed {
                    error: "LLM error: Rate limit exceeded (retry after None)".to_string(),
                },
            ],
            false,
        );

        assert_eq!(
            output,
            "You: tool: bash({\"command\":\"echo hello\"})\n\
             Claude: It printed hello.\n\
             Error: LLM error: Rate limit exceeded (retry after None)\n"
        );
    }

    #[test]
    fn test_colored_labels() {
        let output = rendered(&[AgentEvent::AwaitingInput], true);
        assert_eq!(output, "\u{1b}[94mYou\u{1b}[0m: ");
    }
}
