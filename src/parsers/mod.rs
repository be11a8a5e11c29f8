//! Transcript parsers for various AI coding agents
//!
//! Provides parsers for converting transcript exports from different
//! AI coding assistants (Claude Code, Codex, Gemini CLI, GitHub Copilot, Pi)
//! into the normalized ParsedSession format, plus the detector that picks
//! the right parser for an unlabelled transcript.

pub mod builder;
pub mod claude;
pub mod codex;
pub mod copilot;
pub mod detector;
mod error;
pub mod gemini;
pub mod jsonl;
pub mod pi;

pub use claude::ClaudeParser;
pub use codex::CodexParser;
pub use copilot::CopilotParser;
pub use detector::{detect, detect_and_parse, parse_with_tool, ToolId};
pub use error::ParseError;
pub use gemini::GeminiParser;
pub use pi::PiParser;

use serde_json::Value;

use crate::models::ParsedSession;

/// Trait for parsing raw transcript text into ParsedSession format
///
/// Parsing is best-effort: unknown records are ignored and malformed lines
/// are skipped, so there is no error path.
pub trait LogParser {
    /// Parse transcript content from a string
    fn parse_string(&self, content: &str) -> ParsedSession;
}

/// String field of a JSON object, if present and a string
pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Owned, non-empty string field of a JSON object
pub(crate) fn string_field(value: &Value, key: &str) -> Option<String> {
    str_field(value, key)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Render a JSON value as text: strings verbatim, null as empty, anything else as compact JSON
pub(crate) fn json_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Join the `text` of every part in `parts` whose `type` is one of `types`
///
/// Plain string parts are always included.
pub(crate) fn join_text_parts(parts: &[Value], types: &[&str]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Value::String(s) => Some(s.as_str()),
            Value::Object(_) => {
                let part_type = str_field(part, "type").unwrap_or("text");
                if types.contains(&part_type) {
                    str_field(part, "text")
                } else {
                    None
                }
            }
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
