//! Codex CLI transcript parser
//!
//! Parses Codex CLI transcripts into ParsedSession format. Two wire formats
//! coexist in the wild and are handled by the same pass:
//!
//! - rollout files (`session_meta`, `response_item`, `event_msg`, `turn_context`
//!   records, each with a `payload`)
//! - the legacy `exec --json` event stream (`thread.started`, `item.completed`,
//!   `turn.completed` records, each with an `item`)
//!
//! Assistant output is buffered while it arrives and flushed into a message
//! whenever the kind of content changes (text to tool call or back) or a turn
//! boundary is seen. Every tool call becomes its own message.

use serde_json::Value;
use tracing::trace;

use super::builder::{
    finalize_result, patch_first_open_tool_call, push_message, text_block, tool_call_block,
    truncate_default,
};
use super::detector::ToolId;
use super::jsonl::read_json_lines;
use super::{join_text_parts, json_to_text, str_field, string_field, LogParser};
use crate::models::{ContentBlock, Message, ParsedSession, Role, SessionMetadata};

/// Content part types that carry readable message text
const TEXT_PART_TYPES: &[&str] = &["output_text", "input_text", "text"];

/// Parser for Codex CLI transcripts
#[derive(Debug, Default)]
pub struct CodexParser;

impl CodexParser {
    /// Create a new CodexParser instance
    pub fn new() -> Self {
        Self
    }

    fn parse_jsonl(&self, content: &str) -> ParsedSession {
        let mut state = CodexState::default();
        let mut meta = CodexMeta::default();

        for record in read_json_lines(content) {
            let timestamp = string_field(&record, "timestamp");
            if timestamp.is_some() {
                meta.last_timestamp = timestamp.clone();
            }

            match str_field(&record, "type").unwrap_or("") {
                "session_meta" => meta.read_session_meta(&record),
                "thread.started" => meta.read_thread_started(&record),
                "event_msg" => {
                    let payload = record.get("payload").unwrap_or(&Value::Null);
                    if str_field(payload, "type") == Some("user_message") {
                        state.push_user(user_message_text(payload), timestamp);
                    }
                }
                "response_item" => {
                    let payload = record.get("payload").unwrap_or(&Value::Null);
                    state.apply_response_item(payload, timestamp);
                }
                "item.completed" => {
                    let item = record.get("item").unwrap_or(&Value::Null);
                    state.apply_legacy_item(item, timestamp);
                }
                "turn_context" => {
                    if meta.turn_model.is_none() {
                        meta.turn_model = record
                            .get("payload")
                            .and_then(|p| string_field(p, "model"));
                    }
                    state.flush();
                }
                "turn.completed" => state.flush(),
                other => trace!(record_type = other, "ignoring codex record"),
            }
        }

        state.flush();
        finalize_result(state.messages, meta.into_metadata())
    }
}

impl LogParser for CodexParser {
    fn parse_string(&self, content: &str) -> ParsedSession {
        self.parse_jsonl(content)
    }
}

/// Emitted messages plus the assistant blocks not yet flushed into one
#[derive(Debug, Default)]
struct CodexState {
    messages: Vec<Message>,
    pending: Vec<ContentBlock>,
    pending_timestamp: Option<String>,
}

impl CodexState {
    /// Emit pending assistant blocks as one message
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let blocks = std::mem::take(&mut self.pending);
        let timestamp = self.pending_timestamp.take();
        push_message(&mut self.messages, Role::Assistant, blocks, timestamp);
    }

    fn pending_has(&self, predicate: fn(&ContentBlock) -> bool) -> bool {
        self.pending.iter().any(predicate)
    }

    fn buffer(&mut self, block: ContentBlock, timestamp: Option<String>) {
        if self.pending.is_empty() {
            self.pending_timestamp = timestamp;
        }
        self.pending.push(block);
    }

    fn append_text(&mut self, text: String, timestamp: Option<String>) {
        if text.trim().is_empty() {
            return;
        }
        if self.pending_has(ContentBlock::is_tool_call) {
            self.flush();
        }
        self.buffer(text_block(text), timestamp);
    }

    fn append_tool_call(&mut self, block: ContentBlock, timestamp: Option<String>) {
        if self.pending_has(ContentBlock::is_text) {
            self.flush();
        }
        self.buffer(block, timestamp);
        self.flush();
    }

    fn push_user(&mut self, text: String, timestamp: Option<String>) {
        self.flush();
        if text.trim().is_empty() {
            return;
        }
        push_message(&mut self.messages, Role::User, vec![text_block(text)], timestamp);
    }

    fn apply_response_item(&mut self, payload: &Value, timestamp: Option<String>) {
        match str_field(payload, "type").unwrap_or("") {
            "message" => {
                // User turns here repeat instructions and environment context;
                // the real user text arrives via event_msg.
                if str_field(payload, "role") == Some("assistant") {
                    let text = content_text(payload.get("content").unwrap_or(&Value::Null));
                    self.append_text(text, timestamp);
                }
            }
            "function_call" | "custom_tool_call" => {
                let name = string_field(payload, "name")
                    .or_else(|| string_field(payload, "call_id"))
                    .unwrap_or_else(|| "unknown".to_string());
                let input = payload
                    .get("arguments")
                    .or_else(|| payload.get("input"))
                    .map(|v| truncate_default(&json_to_text(v)))
                    .filter(|s| !s.is_empty());
                self.append_tool_call(tool_call_block(name, input, None, None), timestamp);
            }
            "function_call_output" | "custom_tool_call_output" => {
                let output = unwrap_output(payload.get("output").unwrap_or(&Value::Null));
                patch_first_open_tool_call(&mut self.messages, truncate_default(&output));
            }
            "reasoning" => {
                let summary = payload
                    .get("summary")
                    .and_then(|s| s.get(0))
                    .and_then(|s| string_field(s, "text"))
                    .unwrap_or_default();
                self.append_text(summary, timestamp);
            }
            other => trace!(item_type = other, "ignoring codex response item"),
        }
    }

    fn apply_legacy_item(&mut self, item: &Value, timestamp: Option<String>) {
        let item_type = str_field(item, "type")
            .or_else(|| str_field(item, "item_type"))
            .unwrap_or("");

        match item_type {
            "message" | "agent_message" | "assistant_message" | "reasoning" => {
                if str_field(item, "role") == Some("user") {
                    return;
                }
                let text = match item.get("text") {
                    Some(Value::String(text)) => text.clone(),
                    _ => content_text(item.get("content").unwrap_or(&Value::Null)),
                };
                self.append_text(text, timestamp);
            }
            "function_call" | "command" | "command_execution" => {
                let name = string_field(item, "name").unwrap_or_else(|| "command".to_string());
                let input = item
                    .get("arguments")
                    .map(json_to_text)
                    .or_else(|| item.get("command").map(command_text))
                    .filter(|s| !s.is_empty())
                    .map(|s| truncate_default(&s));
                let output = ["output", "result", "aggregated_output"]
                    .iter()
                    .filter_map(|key| item.get(*key))
                    .find(|v| !v.is_null())
                    .map(unwrap_output)
                    .filter(|s| !s.is_empty())
                    .map(|s| truncate_default(&s));
                self.append_tool_call(tool_call_block(name, input, output, None), timestamp);
            }
            "file_change" => {
                let path = string_field(item, "path")
                    .or_else(|| string_field(item, "file_path"))
                    .or_else(|| {
                        item.get("changes")
                            .and_then(|c| c.get(0))
                            .and_then(|c| string_field(c, "path"))
                    });
                let output = ["diff", "content"]
                    .iter()
                    .find_map(|key| item.get(*key))
                    .map(|v| truncate_default(&json_to_text(v)));
                self.append_tool_call(tool_call_block("FileChange", path, output, None), timestamp);
            }
            other => trace!(item_type = other, "ignoring codex legacy item"),
        }
    }
}

/// Session metadata gathered from either wire format
#[derive(Debug, Default)]
struct CodexMeta {
    session_id: Option<String>,
    start_time: Option<String>,
    model: Option<String>,
    cli_version: Option<String>,
    working_directory: Option<String>,
    git_branch: Option<String>,
    thread_id: Option<String>,
    thread_start: Option<String>,
    turn_model: Option<String>,
    last_timestamp: Option<String>,
}

impl CodexMeta {
    fn read_session_meta(&mut self, record: &Value) {
        let payload = record.get("payload").unwrap_or(&Value::Null);
        self.session_id = string_field(payload, "id");
        self.start_time =
            string_field(payload, "timestamp").or_else(|| string_field(record, "timestamp"));
        self.model = string_field(payload, "model_provider");
        self.cli_version = string_field(payload, "cli_version");
        self.working_directory = string_field(payload, "cwd");
        self.git_branch = payload.get("git").and_then(|g| string_field(g, "branch"));
    }

    fn read_thread_started(&mut self, record: &Value) {
        self.thread_id = string_field(record, "thread_id");
        self.thread_start = string_field(record, "timestamp");
    }

    fn into_metadata(self) -> SessionMetadata {
        SessionMetadata {
            session_id: self.session_id.or(self.thread_id),
            start_time: self.start_time.or(self.thread_start),
            end_time: self.last_timestamp,
            model: self.model.or(self.turn_model),
            cli_version: self.cli_version,
            working_directory: self.working_directory,
            git_branch: self.git_branch,
            ..SessionMetadata::new(ToolId::Codex.as_str())
        }
    }
}

/// Text of an `event_msg` user message: `message`, `text`, or the first content part
fn user_message_text(payload: &Value) -> String {
    string_field(payload, "message")
        .or_else(|| string_field(payload, "text"))
        .or_else(|| {
            payload
                .get("content")
                .and_then(|c| c.get(0))
                .and_then(|c| string_field(c, "text"))
        })
        .unwrap_or_default()
}

/// Message content as text: a plain string, or the text parts of an array
fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => join_text_parts(parts, TEXT_PART_TYPES),
        _ => String::new(),
    }
}

/// A shell command given either as a string or as an argv array
fn command_text(command: &Value) -> String {
    match command {
        Value::Array(argv) => argv
            .iter()
            .map(json_to_text)
            .collect::<Vec<_>>()
            .join(" "),
        other => json_to_text(other),
    }
}

/// Tool output, unwrapped from the JSON wrappers Codex puts around it
///
/// A JSON object (or a string holding one) yields its `output` or `content`
/// field; anything else is used as is.
fn unwrap_output(value: &Value) -> String {
    match value {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(inner @ Value::Object(_)) => output_field(&inner).unwrap_or_else(|| raw.clone()),
            _ => raw.clone(),
        },
        Value::Object(_) => output_field(value).unwrap_or_else(|| value.to_string()),
        other => json_to_text(other),
    }
}

fn output_field(object: &Value) -> Option<String> {
    object
        .get("output")
        .or_else(|| object.get("content"))
        .map(json_to_text)
}
