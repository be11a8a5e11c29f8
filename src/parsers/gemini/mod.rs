//! Gemini CLI transcript parser
//!
//! Parses Gemini CLI transcripts into ParsedSession format. Sessions ship
//! either as one JSON document (`{"sessionId": ..., "messages": [...]}` or a
//! bare array of entries) or as JSONL with a leading `session_metadata`
//! record, so the whole-document form is tried first.
//!
//! ## Supported Features
//!
//! - User and model entries, with `type` or `role` naming the speaker
//! - Thought subjects rendered as bold labels ahead of the reply text
//! - `toolCalls[]` with their function-response output
//! - Inline API-style `functionCall` parts

use serde_json::Value;
use tracing::trace;

use super::builder::{finalize_result, push_message, text_block, tool_call_block, truncate_default};
use super::detector::ToolId;
use super::jsonl::{read_json_lines, read_whole_document};
use super::{json_to_text, str_field, string_field, LogParser};
use crate::models::{ContentBlock, Message, ParsedSession, Role, SessionMetadata};

/// Keys of a session document that may hold the entry list
const ENTRY_KEYS: &[&str] = &["messages", "entries", "conversation"];

/// Keys of an inline function call part
const INLINE_CALL_KEYS: &[&str] = &["functionCall", "tool_call"];

/// Parser for Gemini CLI transcripts
#[derive(Debug, Default)]
pub struct GeminiParser;

impl GeminiParser {
    /// Create a new GeminiParser instance
    pub fn new() -> Self {
        Self
    }

    fn parse_entries(&self, entries: &[Value], header: Option<&Value>) -> ParsedSession {
        let mut messages: Vec<Message> = Vec::new();

        for entry in entries {
            let timestamp = string_field(entry, "timestamp");
            match entry_role(entry) {
                Some(Role::User) => {
                    let blocks = content_blocks(entry_content(entry));
                    push_message(&mut messages, Role::User, blocks, timestamp);
                }
                Some(Role::Assistant) => push_assistant_entry(&mut messages, entry, timestamp),
                None => trace!(entry_type = ?str_field(entry, "type"), "skipping gemini entry"),
            }
        }

        let metadata = build_metadata(header, entries);
        finalize_result(messages, metadata)
    }
}

impl LogParser for GeminiParser {
    fn parse_string(&self, content: &str) -> ParsedSession {
        if let Ok(document) = read_whole_document(content) {
            match &document {
                Value::Array(entries) => return self.parse_entries(entries, None),
                Value::Object(map) => {
                    let entries = ENTRY_KEYS
                        .iter()
                        .find_map(|key| map.get(*key).and_then(Value::as_array));
                    if let Some(entries) = entries {
                        return self.parse_entries(entries, Some(&document));
                    }
                }
                _ => {}
            }
        }

        let records: Vec<Value> = read_json_lines(content).collect();
        let header = records
            .iter()
            .find(|r| str_field(r, "type") == Some("session_metadata"));
        self.parse_entries(&records, header)
    }
}

/// Normalize the speaker of an entry; unknown speakers yield `None`
fn entry_role(entry: &Value) -> Option<Role> {
    let role = str_field(entry, "type").or_else(|| str_field(entry, "role"))?;
    match role {
        "user" | "human" => Some(Role::User),
        "gemini" | "model" | "assistant" => Some(Role::Assistant),
        _ => None,
    }
}

fn entry_content(entry: &Value) -> &Value {
    entry
        .get("content")
        .or_else(|| entry.get("parts"))
        .unwrap_or(&Value::Null)
}

/// Split an assistant entry into a text message, one message per recorded
/// tool call, and one message per inline function call part
fn push_assistant_entry(messages: &mut Vec<Message>, entry: &Value, timestamp: Option<String>) {
    let content = entry_content(entry);

    let mut parts: Vec<String> = entry
        .get("thoughts")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|t| string_field(t, "subject"))
        .map(|subject| format!("**{}**", subject))
        .collect();
    parts.extend(content_blocks(content).into_iter().filter_map(|block| match block {
        ContentBlock::Text { text } => Some(text),
        ContentBlock::ToolCall { .. } => None,
    }));
    if !parts.is_empty() {
        push_message(
            messages,
            Role::Assistant,
            vec![text_block(parts.join("\n"))],
            timestamp.clone(),
        );
    }

    for call in entry
        .get("toolCalls")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        push_message(messages, Role::Assistant, vec![recorded_tool_call(call)], timestamp.clone());
    }

    for part in self::parts(content) {
        if let Some(call) = inline_call(part) {
            push_message(messages, Role::Assistant, vec![call], timestamp.clone());
        }
    }
}

/// Content parts as a slice: arrays as is, a single object as one part
fn parts(content: &Value) -> &[Value] {
    match content {
        Value::Array(items) => items,
        Value::Object(_) => std::slice::from_ref(content),
        _ => &[],
    }
}

/// Blocks of a content value: string, array of strings, or array of parts
fn content_blocks(content: &Value) -> Vec<ContentBlock> {
    if let Value::String(text) = content {
        return non_empty_text(text).into_iter().collect();
    }

    parts(content)
        .iter()
        .filter_map(|part| match part {
            Value::String(text) => non_empty_text(text),
            Value::Object(_) => str_field(part, "text")
                .and_then(non_empty_text)
                .or_else(|| inline_call(part))
                .or_else(|| function_response(part)),
            _ => None,
        })
        .collect()
}

fn non_empty_text(text: &str) -> Option<ContentBlock> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text_block(text))
    }
}

/// Tool call from an inline `functionCall`/`tool_call` part
fn inline_call(part: &Value) -> Option<ContentBlock> {
    let call = INLINE_CALL_KEYS.iter().find_map(|key| part.get(*key))?;
    let name = string_field(call, "name").unwrap_or_else(|| "unknown".to_string());
    let input = call
        .get("args")
        .or_else(|| call.get("arguments"))
        .map(|args| truncate_default(&json_to_text(args)));
    Some(tool_call_block(name, input, None, None))
}

/// Tool call carrying the output of a `functionResponse` part
fn function_response(part: &Value) -> Option<ContentBlock> {
    let response = part.get("functionResponse")?;
    let name = string_field(response, "name").unwrap_or_else(|| "unknown".to_string());
    let output = response.get("response").map(|r| {
        let text = r
            .get("output")
            .or_else(|| r.get("content"))
            .map(json_to_text)
            .unwrap_or_else(|| json_to_text(r));
        truncate_default(&text)
    });
    Some(tool_call_block(name, None, output, None))
}

/// Tool call from a `toolCalls[]` entry, output taken from its function responses
fn recorded_tool_call(call: &Value) -> ContentBlock {
    let name = string_field(call, "name")
        .or_else(|| string_field(call, "displayName"))
        .unwrap_or_else(|| "unknown".to_string());
    let input = call
        .get("args")
        .filter(|a| !a.is_null())
        .map(|args| truncate_default(&json_to_text(args)));

    let output = call
        .get("result")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|r| r.pointer("/functionResponse/response/output"))
        .map(json_to_text)
        .collect::<Vec<_>>()
        .join("\n");
    let output = if output.is_empty() {
        string_field(call, "resultDisplay")
    } else {
        Some(output)
    };

    tool_call_block(name, input, output.map(|o| truncate_default(&o)), None)
}

fn build_metadata(header: Option<&Value>, entries: &[Value]) -> SessionMetadata {
    let mut metadata = SessionMetadata::new(ToolId::GeminiCli.as_str());

    if let Some(header) = header {
        metadata.session_id =
            string_field(header, "sessionId").or_else(|| string_field(header, "session_id"));
        metadata.start_time =
            string_field(header, "startTime").or_else(|| string_field(header, "start_time"));
        metadata.end_time =
            string_field(header, "lastUpdated").or_else(|| string_field(header, "last_updated"));
    }
    metadata.model = entries.iter().find_map(|e| string_field(e, "model"));

    metadata
}
