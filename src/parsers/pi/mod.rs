//! Pi coding agent transcript parser
//!
//! Pi stores sessions as JSONL: a `session` header followed by entries such as
//! `message`, `model_change` and `thinking_level_change`. Only `message`
//! entries carry conversation content; their payload is tagged by `role`
//! (`user`, `assistant`, `toolResult`).
//!
//! Tool results are not correlated by id. Each one fills the earliest tool
//! call that still has no output.

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use super::builder::{
    finalize_result, patch_first_open_tool_call, push_message, text_block, tool_call_block, truncate,
    truncate_default,
};
use super::detector::ToolId;
use super::jsonl::read_json_lines;
use super::{join_text_parts, json_to_text, str_field, string_field, LogParser};
use crate::models::{ContentBlock, Message, ParsedSession, Role, SessionMetadata};

/// Maximum length of a thinking block rendered into the transcript
const THINKING_MAX_LENGTH: usize = 500;

/// Assistant content block of a Pi message
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum PiBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    ToolCall {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        arguments: Value,
    },
    #[serde(other)]
    Other,
}

/// Parser for Pi transcripts
#[derive(Debug, Default)]
pub struct PiParser;

impl PiParser {
    /// Create a new PiParser instance
    pub fn new() -> Self {
        Self
    }

    fn parse_jsonl(&self, content: &str) -> ParsedSession {
        let records: Vec<Value> = read_json_lines(content).collect();
        let mut messages: Vec<Message> = Vec::new();
        let mut changed_model: Option<String> = None;
        let mut message_model: Option<String> = None;

        for record in &records {
            let timestamp = string_field(record, "timestamp");

            match str_field(record, "type").unwrap_or("") {
                "message" => {
                    let message = record.get("message").unwrap_or(&Value::Null);
                    match str_field(message, "role").unwrap_or("") {
                        "user" => {
                            let text = message_text(message);
                            if !text.trim().is_empty() {
                                push_message(&mut messages, Role::User, vec![text_block(text)], timestamp);
                            }
                        }
                        "assistant" => {
                            if message_model.is_none() {
                                message_model = string_field(message, "model");
                            }
                            push_assistant_message(&mut messages, message, timestamp);
                        }
                        "toolResult" => {
                            let output = truncate_default(&message_text(message));
                            patch_first_open_tool_call(&mut messages, output);
                        }
                        other => trace!(role = other, "ignoring pi message role"),
                    }
                }
                "model_change" => {
                    if changed_model.is_none() {
                        changed_model = string_field(record, "modelId");
                    }
                }
                other => trace!(record_type = other, "ignoring pi record"),
            }
        }

        let mut metadata = build_metadata(&records);
        metadata.model = changed_model.or(message_model);
        finalize_result(messages, metadata)
    }
}

impl LogParser for PiParser {
    fn parse_string(&self, content: &str) -> ParsedSession {
        self.parse_jsonl(content)
    }
}

/// Text of a user or tool-result message: a plain string or its text blocks
fn message_text(message: &Value) -> String {
    match message.get("content") {
        Some(Value::Array(parts)) => join_text_parts(parts, &["text"]),
        Some(other) => json_to_text(other),
        None => String::new(),
    }
}

/// Walk assistant blocks in order, cutting the text run at every tool call
fn push_assistant_message(messages: &mut Vec<Message>, message: &Value, timestamp: Option<String>) {
    let blocks = message
        .get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut text: Vec<ContentBlock> = Vec::new();
    for raw in blocks {
        let Ok(block) = PiBlock::deserialize(raw) else {
            trace!("skipping undecodable pi content block");
            continue;
        };
        match block {
            PiBlock::Text { text: t } if !t.trim().is_empty() => text.push(text_block(t)),
            PiBlock::Thinking { thinking } if !thinking.trim().is_empty() => {
                let label = format!("**Thinking:** {}", truncate(&thinking, THINKING_MAX_LENGTH));
                text.push(text_block(label));
            }
            PiBlock::ToolCall { name, arguments } => {
                push_message(messages, Role::Assistant, std::mem::take(&mut text), timestamp.clone());
                let input = Some(truncate_default(&json_to_text(&arguments))).filter(|s| !s.is_empty());
                let name = name.unwrap_or_else(|| "unknown".to_string());
                push_message(
                    messages,
                    Role::Assistant,
                    vec![tool_call_block(name, input, None, None)],
                    timestamp.clone(),
                );
            }
            _ => {}
        }
    }
    push_message(messages, Role::Assistant, text, timestamp);
}

/// Session header (or the first record) plus the last timestamp seen
fn build_metadata(records: &[Value]) -> SessionMetadata {
    let mut metadata = SessionMetadata::new(ToolId::Pi.as_str());

    let header = records
        .iter()
        .find(|r| str_field(r, "type") == Some("session"))
        .or_else(|| records.first());
    if let Some(header) = header {
        metadata.session_id = string_field(header, "id");
        metadata.start_time = string_field(header, "timestamp");
        metadata.working_directory = string_field(header, "cwd");
    }
    metadata.end_time = records.iter().rev().find_map(|r| string_field(r, "timestamp"));

    metadata
}
