//! Tool detection
//!
//! Works out which coding agent produced a transcript from the shape of its
//! first record, falling back to a whole-document parse for pretty-printed
//! JSON exports. Detection never fails: anything unrecognized is treated as
//! Claude Code, the most common and most forgiving format.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::jsonl::{parse_line, read_whole_document};
use super::{
    str_field, ClaudeParser, CodexParser, CopilotParser, GeminiParser, LogParser, ParseError,
    PiParser,
};
use crate::models::ParsedSession;

/// Event prefixes used by the legacy Codex `exec --json` stream
static CODEX_EVENT_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(thread|turn|item|event_msg)\.").unwrap());

/// Keys whose presence on the first record marks a JSONL transcript
const JSONL_MARKER_KEYS: &[&str] = &["sessionId", "version", "parentId", "parentUuid", "parentSession"];

/// Identifier of a supported coding agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    ClaudeCode,
    Codex,
    GeminiCli,
    Pi,
    GithubCopilot,
}

impl ToolId {
    /// Every supported tool, in registry order
    pub const ALL: [ToolId; 5] = [
        Self::ClaudeCode,
        Self::Codex,
        Self::GeminiCli,
        Self::Pi,
        Self::GithubCopilot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaudeCode => "claude_code",
            Self::Codex => "codex",
            Self::GeminiCli => "gemini_cli",
            Self::Pi => "pi",
            Self::GithubCopilot => "github_copilot",
        }
    }

    /// Identifiers of every supported tool
    pub fn supported() -> Vec<&'static str> {
        Self::ALL.iter().map(ToolId::as_str).collect()
    }

    /// Parse `content` with this tool's parser
    pub fn parse(&self, content: &str) -> ParsedSession {
        match self {
            Self::ClaudeCode => ClaudeParser::new().parse_string(content),
            Self::Codex => CodexParser::new().parse_string(content),
            Self::GeminiCli => GeminiParser::new().parse_string(content),
            Self::Pi => PiParser::new().parse_string(content),
            Self::GithubCopilot => CopilotParser::new().parse_string(content),
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ParseError::unknown_tool(s, &Self::supported()))
    }
}

/// Detect the tool that produced `content`
///
/// `filename` is accepted for callers that have one but does not currently
/// influence the result.
pub fn detect(content: &str, _filename: Option<&str>) -> ToolId {
    let first_line = content.lines().next().unwrap_or("").trim();

    if first_line.starts_with('{') {
        if let Some(record) = parse_line(first_line) {
            if let Some(tool) = detect_from_first_record(&record) {
                debug!(tool = %tool, "detected tool from first record");
                return tool;
            }
        }
    }

    if let Ok(Value::Object(doc)) = read_whole_document(content) {
        if !doc.contains_key("parentId") {
            debug!("detected gemini_cli from whole-document JSON");
            return ToolId::GeminiCli;
        }
    }

    debug!("no detection heuristic matched, defaulting to claude_code");
    ToolId::ClaudeCode
}

/// Heuristics on the first JSONL record; `None` means "undecided"
fn detect_from_first_record(record: &Value) -> Option<ToolId> {
    let record_type = str_field(record, "type").unwrap_or("");

    if record_type == "session.start" {
        return Some(ToolId::GithubCopilot);
    }
    if CODEX_EVENT_TYPE.is_match(record_type) || record_type == "session_meta" {
        return Some(ToolId::Codex);
    }
    if record_type == "session" && record.get("version").is_some() {
        return Some(ToolId::Pi);
    }
    if record_type == "session_metadata" {
        return Some(ToolId::GeminiCli);
    }
    if JSONL_MARKER_KEYS.iter().any(|key| record.get(*key).is_some()) {
        return Some(detect_jsonl_flavor(record));
    }
    None
}

/// Tell Pi and Claude Code JSONL apart by their parent-link keys
fn detect_jsonl_flavor(record: &Value) -> ToolId {
    if record.get("parentId").is_some() || record.get("parentSession").is_some() {
        ToolId::Pi
    } else {
        ToolId::ClaudeCode
    }
}

/// Detect the producing tool and parse with its parser
pub fn detect_and_parse(content: &str, filename: Option<&str>) -> (ToolId, ParsedSession) {
    let tool = detect(content, filename);
    (tool, tool.parse(content))
}

/// Parse with an explicitly named tool
///
/// Fails with [`ParseError::UnknownTool`] if `tool_name` is not a supported identifier.
pub fn parse_with_tool(tool_name: &str, content: &str) -> Result<ParsedSession, ParseError> {
    let tool: ToolId = tool_name.parse()?;
    Ok(tool.parse(content))
}
