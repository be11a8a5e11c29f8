//! GitHub Copilot CLI transcript parser
//!
//! Parses Copilot CLI session event logs (JSONL, one `{type, data, timestamp}`
//! event per line) into ParsedSession format. Tool requests carry their own
//! call id, and `tool.execution_complete` events are matched back to the
//! request with that exact id rather than in arrival order.

use serde_json::Value;
use tracing::trace;

use super::builder::{finalize_result, patch_tool_call_by_id, push_message, text_block, tool_call_block, truncate_default};
use super::detector::ToolId;
use super::jsonl::read_json_lines;
use super::{json_to_text, str_field, string_field, LogParser};
use crate::models::{Message, ParsedSession, Role, SessionMetadata};

/// Internal telemetry tool that never reaches the transcript
const REPORT_INTENT_TOOL: &str = "report_intent";

/// Parser for GitHub Copilot CLI transcripts
#[derive(Debug, Default)]
pub struct CopilotParser;

impl CopilotParser {
    /// Create a new CopilotParser instance
    pub fn new() -> Self {
        Self
    }

    fn parse_jsonl(&self, content: &str) -> ParsedSession {
        let mut messages: Vec<Message> = Vec::new();
        let mut metadata = SessionMetadata::new(ToolId::GithubCopilot.as_str());
        let mut last_timestamp: Option<String> = None;

        for event in read_json_lines(content) {
            let timestamp = string_field(&event, "timestamp");
            if timestamp.is_some() {
                last_timestamp = timestamp.clone();
            }
            let data = event.get("data").unwrap_or(&Value::Null);

            match str_field(&event, "type").unwrap_or("") {
                "session.start" => read_session_start(&mut metadata, data, timestamp),
                "user.message" => {
                    let blocks = string_field(data, "content")
                        .filter(|c| !c.trim().is_empty())
                        .map(text_block)
                        .into_iter()
                        .collect();
                    push_message(&mut messages, Role::User, blocks, timestamp);
                }
                "assistant.message" => push_assistant_message(&mut messages, data, timestamp),
                "tool.execution_complete" => {
                    if metadata.model.is_none() {
                        metadata.model = string_field(data, "model");
                    }
                    let Some(id) = str_field(data, "toolCallId") else {
                        trace!("tool completion without a call id");
                        continue;
                    };
                    if let Some(result) = execution_result(data) {
                        patch_tool_call_by_id(&mut messages, id, truncate_default(&result));
                    }
                }
                other => trace!(event_type = other, "ignoring copilot event"),
            }
        }

        metadata.end_time = last_timestamp;
        finalize_result(messages, metadata)
    }
}

impl LogParser for CopilotParser {
    fn parse_string(&self, content: &str) -> ParsedSession {
        self.parse_jsonl(content)
    }
}

fn read_session_start(metadata: &mut SessionMetadata, data: &Value, timestamp: Option<String>) {
    metadata.session_id = string_field(data, "sessionId");
    metadata.start_time = string_field(data, "startTime").or(timestamp);
    metadata.cli_version = string_field(data, "copilotVersion");
    if let Some(context) = data.get("context") {
        metadata.working_directory = string_field(context, "cwd");
        metadata.git_branch = string_field(context, "branch");
    }
}

/// Emit the reply text, then one message per tool request
fn push_assistant_message(messages: &mut Vec<Message>, data: &Value, timestamp: Option<String>) {
    if let Some(text) = string_field(data, "content").filter(|c| !c.trim().is_empty()) {
        push_message(messages, Role::Assistant, vec![text_block(text)], timestamp.clone());
    }

    let requests = data
        .get("toolRequests")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();

    for request in requests {
        let name = string_field(request, "name").unwrap_or_else(|| "unknown".to_string());
        if name == REPORT_INTENT_TOOL {
            continue;
        }
        let input = request
            .get("arguments")
            .map(|args| truncate_default(&json_to_text(args)))
            .filter(|s| !s.is_empty());
        let id = string_field(request, "toolCallId");
        push_message(
            messages,
            Role::Assistant,
            vec![tool_call_block(name, input, None, id)],
            timestamp.clone(),
        );
    }
}

/// Result text of a completed tool: `detailedContent`, then `content`, then the raw result
///
/// The raw result is only used when neither text field is present; present
/// but empty fields leave the output absent. A failed execution without a
/// result reports its error message instead.
fn execution_result(data: &Value) -> Option<String> {
    match data.get("result") {
        Some(result @ Value::Object(_)) => {
            let detailed = str_field(result, "detailedContent");
            let content = str_field(result, "content");
            if detailed.is_none() && content.is_none() {
                return Some(json_to_text(result));
            }
            detailed
                .filter(|s| !s.is_empty())
                .or(content.filter(|s| !s.is_empty()))
                .map(String::from)
        }
        Some(Value::Null) | None => data
            .get("error")
            .and_then(|e| string_field(e, "message")),
        Some(raw) => Some(json_to_text(raw)),
    }
}

#[cfg(test)]
mod tests;
