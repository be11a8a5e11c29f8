//! Claude Code transcript parser
//!
//! Parses JSONL transcripts exported from Claude Code into ParsedSession format.
//! Each line is a JSON record; only `user` and `assistant` records carry
//! conversation content. Tool results arrive in later `user` records, so they
//! are collected into a lookup table first and attached to the matching
//! `tool_use` block when the assistant message is built.

mod types;

pub use types::{ClaudeContent, ClaudeContentBlock, ClaudeMessage, ClaudeToolResultContent};

use std::collections::HashMap;

use serde_json::Value;

use super::builder::{finalize_result, push_message, text_block, tool_call_block, truncate, truncate_default};
use super::detector::ToolId;
use super::jsonl::read_json_lines;
use super::{str_field, string_field, LogParser};
use crate::models::{ContentBlock, Message, ParsedSession, Role, SessionMetadata};

/// Maximum length of a Task prompt used as a tool summary
const TASK_PROMPT_MAX_LENGTH: usize = 200;

/// Parser for Claude Code transcripts
#[derive(Debug, Default)]
pub struct ClaudeParser;

impl ClaudeParser {
    /// Create a new ClaudeParser instance
    pub fn new() -> Self {
        Self
    }

    fn parse_jsonl(&self, content: &str) -> ParsedSession {
        let records: Vec<Value> = read_json_lines(content)
            .filter(|r| matches!(str_field(r, "type"), Some("user" | "assistant")))
            .collect();

        let results = collect_tool_results(&records);
        let mut messages: Vec<Message> = Vec::new();
        let mut model: Option<String> = None;

        for record in &records {
            let message = decode_message(record);
            let timestamp = string_field(record, "timestamp");

            if model.is_none() {
                model = message.model.clone().filter(|m| !m.is_empty());
            }

            let blocks = message
                .content
                .as_ref()
                .map(ClaudeContent::blocks)
                .unwrap_or_default();

            match str_field(record, "type") {
                Some("user") => {
                    let content = blocks
                        .into_iter()
                        .filter_map(|b| match b {
                            ClaudeContentBlock::Text { text } if !text.trim().is_empty() => {
                                Some(text_block(text))
                            }
                            _ => None,
                        })
                        .collect();
                    push_message(&mut messages, Role::User, content, timestamp);
                }
                Some("assistant") => {
                    let content = blocks
                        .into_iter()
                        .filter_map(|b| assistant_block(b, &results))
                        .collect();
                    push_message(&mut messages, Role::Assistant, content, timestamp);
                }
                _ => {}
            }
        }

        let metadata = build_metadata(&records, model);
        finalize_result(messages, metadata)
    }
}

impl LogParser for ClaudeParser {
    fn parse_string(&self, content: &str) -> ParsedSession {
        self.parse_jsonl(content)
    }
}

fn decode_message(record: &Value) -> ClaudeMessage {
    record
        .get("message")
        .and_then(|m| serde_json::from_value(m.clone()).ok())
        .unwrap_or_default()
}

/// Map every `tool_use_id` to its truncated result text
fn collect_tool_results(records: &[Value]) -> HashMap<String, String> {
    let mut results = HashMap::new();

    for record in records.iter().filter(|r| str_field(r, "type") == Some("user")) {
        let Some(content) = decode_message(record).content else {
            continue;
        };
        for block in content.blocks() {
            if let ClaudeContentBlock::ToolResult { tool_use_id, content } = block {
                results.insert(tool_use_id, truncate_default(&content.as_text()));
            }
        }
    }

    results
}

fn assistant_block(block: ClaudeContentBlock, results: &HashMap<String, String>) -> Option<ContentBlock> {
    match block {
        ClaudeContentBlock::Text { text } if !text.trim().is_empty() => Some(text_block(text)),
        ClaudeContentBlock::ToolUse { id, name, input } => {
            let summary = summarize_tool_input(&name, &input);
            let output = results.get(&id).cloned();
            Some(tool_call_block(name, summary, output, None))
        }
        _ => None,
    }
}

/// Human-readable summary of a tool's input
///
/// Known tools are reduced to the one argument that identifies the call;
/// anything else (or a known tool missing that argument) falls back to the
/// truncated JSON of the whole input.
pub fn summarize_tool_input(name: &str, input: &Value) -> Option<String> {
    let summary = match name {
        "Read" | "Write" | "Edit" | "MultiEdit" => string_field(input, "file_path"),
        "NotebookEdit" => string_field(input, "notebook_path"),
        "Bash" => string_field(input, "command"),
        "Glob" => string_field(input, "pattern"),
        "Grep" => {
            let pattern = str_field(input, "pattern").unwrap_or("");
            let path = str_field(input, "path").unwrap_or("");
            Some(format!("{} {}", pattern, path).trim().to_string()).filter(|s| !s.is_empty())
        }
        "Task" => string_field(input, "description").or_else(|| {
            str_field(input, "prompt").map(|p| truncate(p, TASK_PROMPT_MAX_LENGTH))
        }),
        "WebFetch" => string_field(input, "url"),
        "WebSearch" => string_field(input, "query"),
        "TodoWrite" => input
            .get("todos")
            .and_then(Value::as_array)
            .map(|todos| format!("{} todos", todos.len())),
        _ => None,
    };

    match summary {
        Some(s) => Some(truncate_default(&s)),
        None if input.is_null() => None,
        None => Some(truncate_default(&input.to_string())),
    }
}

fn build_metadata(records: &[Value], model: Option<String>) -> SessionMetadata {
    let mut metadata = SessionMetadata::new(ToolId::ClaudeCode.as_str());
    metadata.model = model;

    if let Some(first) = records.first() {
        metadata.session_id = string_field(first, "sessionId");
        metadata.start_time = string_field(first, "timestamp");
        metadata.working_directory = string_field(first, "cwd");
        metadata.git_branch = string_field(first, "gitBranch");
        metadata.cli_version = string_field(first, "version");
    }
    if let Some(last) = records.last() {
        metadata.end_time = string_field(last, "timestamp");
    }

    metadata
}
