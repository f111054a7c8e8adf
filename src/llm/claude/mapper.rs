//! Mapping between abstraction types and Claude-specific types

use crate::llm::core::types::{
    ContentBlock, ContentBlockStart, ContentDelta, FinishReason, GenerateRequest, Message,
    MessageMetadata, MessageRole, PartialToolUse, StreamEvent, ToolDeclaration, UsageMetadata,
};

use super::types::{
    ClaudeContent, ClaudeContentBlock, ClaudeContentBlockStart, ClaudeContentDelta, ClaudeMessage,
    ClaudeStreamEvent, ClaudeTool, MessagesRequest,
};

/// Convert our abstraction request to Claude's request format
pub fn to_claude_request(request: GenerateRequest) -> MessagesRequest {
    MessagesRequest {
        model: request.config.model,
        max_tokens: request.config.max_tokens,
        messages: request.messages.into_iter().map(to_claude_message).collect(),
        system: request.system,
        tools: request
            .tools
            .filter(|tools| !tools.is_empty())
            .map(|tools| tools.into_iter().map(to_claude_tool).collect()),
        temperature: request.config.temperature,
        top_p: request.config.top_p,
        stop_sequences: request.config.stop_sequences,
        stream: true,
    }
}

/// Convert our Message to Claude's ClaudeMessage
fn to_claude_message(message: Message) -> ClaudeMessage {
    let role = match message.role {
        MessageRole::User => "user".to_string(),
        MessageRole::Assistant => "assistant".to_string(),
        MessageRole::Tool => "user".to_string(), // Tool results go in user messages for Claude
    };

    // If there's only one text block, use simple text content
    if let [ContentBlock::Text { text }] = message.content.as_slice() {
        return ClaudeMessage {
            role,
            content: ClaudeContent::Text(text.clone()),
        };
    }

    let blocks = message
        .content
        .into_iter()
        .map(to_claude_content_block)
        .collect();

    ClaudeMessage {
        role,
        content: ClaudeContent::Blocks(blocks),
    }
}

/// Convert our ContentBlock to Claude's ClaudeContentBlock
fn to_claude_content_block(block: ContentBlock) -> ClaudeContentBlock {
    match block {
        ContentBlock::Text { text } => ClaudeContentBlock::Text { text },
        ContentBlock::ToolUse { id, name, input } => ClaudeContentBlock::ToolUse { id, name, input },
        ContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => ClaudeContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error: is_error.then_some(true),
        },
    }
}

/// Convert our ToolDeclaration to Claude's ClaudeTool
fn to_claude_tool(tool: ToolDeclaration) -> ClaudeTool {
    ClaudeTool {
        name: tool.name,
        description: tool.description,
        input_schema: tool.input_schema,
    }
}

fn finish_reason(stop_reason: &str) -> FinishReason {
    match stop_reason {
        "end_turn" => FinishReason::EndTurn,
        "max_tokens" => FinishReason::MaxTokens,
        "stop_sequence" => FinishReason::StopSequence,
        "tool_use" => FinishReason::ToolUse,
        "refusal" => FinishReason::Refusal,
        other => FinishReason::Other(other.to_string()),
    }
}

/// Convert Claude's stream event to our abstraction's StreamEvent
///
/// Returns a vector because keep-alive and stop events map to nothing.
pub fn from_claude_event(
    event: ClaudeStreamEvent,
    accumulated_usage: &mut UsageMetadata,
) -> Vec<StreamEvent> {
    match event {
        ClaudeStreamEvent::MessageStart { message } => {
            *accumulated_usage =
                UsageMetadata::new(message.usage.input_tokens, message.usage.output_tokens);

            vec![StreamEvent::MessageStart {
                message: MessageMetadata {
                    id: message.id,
                    role: MessageRole::Assistant,
                    usage: Some(*accumulated_usage),
                },
            }]
        }
        ClaudeStreamEvent::ContentBlockStart {
            index,
            content_block,
        } => {
            let block = match content_block {
                ClaudeContentBlockStart::Text { text } => ContentBlockStart::Text { text },
                ClaudeContentBlockStart::ToolUse { id, name } => {
                    ContentBlockStart::ToolUse { id, name }
                }
                ClaudeContentBlockStart::Unknown => return vec![],
            };

            vec![StreamEvent::ContentBlockStart { index, block }]
        }
        ClaudeStreamEvent::ContentBlockDelta { index, delta } => {
            let delta = match delta {
                ClaudeContentDelta::TextDelta { text } => ContentDelta::TextDelta { text },
                ClaudeContentDelta::InputJsonDelta { partial_json } => ContentDelta::ToolUseDelta {
                    partial: PartialToolUse {
                        partial_json,
                    },
                },
                ClaudeContentDelta::Unknown => return vec![],
            };

            vec![StreamEvent::ContentDelta { index, delta }]
        }
        ClaudeStreamEvent::ContentBlockStop { index } => {
            vec![StreamEvent::ContentBlockEnd { index }]
        }
        ClaudeStreamEvent::MessageDelta { delta, usage } => {
            if let Some(usage) = usage {
                accumulated_usage.output_tokens = usage.output_tokens;
                accumulated_usage.total_tokens =
                    accumulated_usage.input_tokens + accumulated_usage.output_tokens;
            }

            // A stop reason marks the final delta
            match delta.stop_reason {
                Some(stop_reason) => vec![StreamEvent::MessageEnd {
                    finish_reason: finish_reason(&stop_reason),
                    usage: *accumulated_usage,
                }],
                None => vec![StreamEvent::MessageDelta {
                    usage: Some(*accumulated_usage),
                }],
            }
        }
        ClaudeStreamEvent::MessageStop | ClaudeStreamEvent::Ping => vec![],
        ClaudeStreamEvent::Error { error } => {
            vec![StreamEvent::Error {
                error: format!("{}: {}", error.error_type, error.message),
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::GenerationConfig;
    use crate::llm::core::types::{ToolCall, ToolResult};

    use super::super::types::{ClaudeErrorData, ClaudeMessageDeltaData, ClaudeUsage};

    #[test]
    fn test_to_claude_request_basic() {
        let request = GenerateRequest {
            messages: vec![Message::user("Hello")],
            tools: None,
            config: GenerationConfig::new("claude-haiku-4-5", 1024).with_temperature(0.7),
            system: Some("You are helpful".to_string()),
        };

        let claude_request = to_claude_request(request);

        assert_eq!(claude_request.model, "claude-haiku-4-5");
        assert_eq!(claude_request.max_tokens, 1024);
        assert_eq!(claude_request.temperature, Some(0.7));
        assert_eq!(claude_request.system, Some("You are helpful".to_string()));
        assert!(claude_request.stream);
        assert_eq!(claude_request.messages.len(), 1);
    }

    #[test]
    fn test_empty_tool_list_is_omitted() {
        let request = GenerateRequest {
            messages: vec![Message::user("Hello")],
            tools: Some(vec![]),
            config: GenerationConfig::default(),
            system: None,
        };

        assert!(to_claude_request(request).tools.is_none());
    }

    #[test]
    fn test_to_claude_message_simple_text() {
        let claude_message = to_claude_message(Message::user("Hello"));

        assert_eq!(claude_message.role, "user");
        match claude_message.content {
            ClaudeContent::Text(text) => assert_eq!(text, "Hello"),
            _ => panic!("Expected simple text content"),
        }
    }

    #[test]
    fn test_to_claude_message_with_tool_use() {
        let message = Message::assistant_with_tool_calls(
            Some("Let me check".to_string()),
            vec![ToolCall {
                id: "toolu_1".to_string(),
                name: "bash".to_string(),
                input: serde_json::json!({"command": "echo hello"}),
            }],
        );

        let claude_message = to_claude_message(message);
        assert_eq!(claude_message.role, "assistant");

        match claude_message.content {
            ClaudeContent::Blocks(blocks) => {
                assert_eq!(blocks.len(), 2);
                match &blocks[1] {
                    ClaudeContentBlock::ToolUse { id, name, input } => {
                        assert_eq!(id, "toolu_1");
                        assert_eq!(name, "bash");
                        assert_eq!(input["command"], "echo hello");
                    }
                    _ => panic!("Expected tool use block"),
                }
            }
            _ => panic!("Expected blocks content"),
        }
    }

    #[test]
    fn test_tool_results_become_one_user_message() {
        let message = Message::tool_results(vec![
            ToolResult::success("toolu_1", "hello"),
            ToolResult::error("toolu_2", "Unknown tool: nope"),
        ]);
        let claude_message = to_claude_message(message);

        assert_eq!(claude_message.role, "user");
        match claude_message.content {
            ClaudeContent::Blocks(blocks) => {
                assert_eq!(blocks.len(), 2);
                match (&blocks[0], &blocks[1]) {
                    (
                        ClaudeContentBlock::ToolResult { is_error: first, .. },
                        ClaudeContentBlock::ToolResult {
                            tool_use_id,
                            is_error: second,
                            ..
                        },
                    ) => {
                        assert_eq!(*first, None);
                        assert_eq!(tool_use_id, "toolu_2");
                        assert_eq!(*second, Some(true));
                    }
                    _ => panic!("Expected tool result blocks"),
                }
            }
            _ => panic!("Expected blocks content"),
        }
    }

    #[test]
    fn test_input_json_delta_maps_to_tool_use_delta() {
        let event = ClaudeStreamEvent::ContentBlockDelta {
            index: 1,
            delta: ClaudeContentDelta::InputJsonDelta {
                partial_json: "{\"path\":".to_string(),
            },
        };

        let mut usage = UsageMetadata::new(0, 0);
        let events = from_claude_event(event, &mut usage);

        match events.as_slice() {
            [StreamEvent::ContentDelta {
                index: 1,
                delta: ContentDelta::ToolUseDelta { partial },
            }] => assert_eq!(partial.partial_json, "{\"path\":"),
            other => panic!("Unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_block_and_delta_are_ignored() {
        let mut usage = UsageMetadata::new(0, 0);

        let start = ClaudeStreamEvent::ContentBlockStart {
            index: 0,
            content_block: ClaudeContentBlockStart::Unknown,
        };
        assert!(from_claude_event(start, &mut usage).is_empty());

        let delta = ClaudeStreamEvent::ContentBlockDelta {
            index: 0,
            delta: ClaudeContentDelta::Unknown,
        };
        assert!(from_claude_event(delta, &mut usage).is_empty());
    }

    #[test]
    fn test_message_delta_with_stop_reason_ends_message() {
        let event = ClaudeStreamEvent::MessageDelta {
            delta: ClaudeMessageDeltaData {
                stop_reason: Some("tool_use".to_string()),
                stop_sequence: None,
            },
            usage: Some(ClaudeUsage {
                input_tokens: 0,
                output_tokens: 25,
            }),
        };

        let mut accumulated_usage = UsageMetadata::new(10, 0);
        let events = from_claude_event(event, &mut accumulated_usage);

        match events.as_slice() {
            [StreamEvent::MessageEnd {
                finish_reason,
                usage,
            }] => {
                assert_eq!(*finish_reason, FinishReason::ToolUse);
                assert_eq!(usage.output_tokens, 25);
                assert_eq!(usage.total_tokens, 35);
            }
            other => panic!("Unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(finish_reason("end_turn"), FinishReason::EndTurn);
        assert_eq!(finish_reason("max_tokens"), FinishReason::MaxTokens);
        assert_eq!(finish_reason("stop_sequence"), FinishReason::StopSequence);
        assert_eq!(finish_reason("refusal"), FinishReason::Refusal);
        assert_eq!(
            finish_reason("pause_turn"),
            FinishReason::Other("pause_turn".to_string())
        );
    }

    #[test]
    fn test_ping_and_stop_produce_nothing() {
        let mut usage = UsageMetadata::new(0, 0);
        assert!(from_claude_event(ClaudeStreamEvent::Ping, &mut usage).is_empty());
        assert!(from_claude_event(ClaudeStreamEvent::MessageStop, &mut usage).is_empty());
    }

    #[test]
    fn test_error_event() {
        let event = ClaudeStreamEvent::Error {
            error: ClaudeErrorData {
                error_type: "overloaded_error".to_string(),
                message: "Overloaded".to_string(),
            },
        };
        let mut usage = UsageMetadata::new(0, 0);
        match from_claude_event(event, &mut usage).as_slice() {
            [StreamEvent::Error { error }] => assert_eq!(error, "overloaded_error: Overloaded"),
            other => panic!("Unexpected events: {:?}", other),
        }
    }
}
