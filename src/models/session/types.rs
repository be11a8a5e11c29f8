//! Session type definitions
//!
//! Contains the normalized conversation structure shared by every parser:
//! roles, messages, session metadata and the parse result itself.

use serde::{Deserialize, Serialize};

use super::ContentBlock;

/// Role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Session-level metadata
///
/// Every optional field is omitted from the serialized form when absent.
/// [`SessionMetadata::compact`] turns blank strings into `None` so that a
/// finalized session never carries empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionMetadata {
    /// Identifier of the producing tool (see `ToolId`)
    pub tool_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Model name (or provider, for Codex sessions that only record one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_version: Option<String>,

    /// Number of messages in the finalized session
    #[serde(default)]
    pub total_messages: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
}

impl SessionMetadata {
    /// Create metadata for the given tool identifier
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            ..Default::default()
        }
    }

    /// Drop blank values so they are omitted rather than emitted empty
    pub fn compact(mut self) -> Self {
        for field in [
            &mut self.session_id,
            &mut self.start_time,
            &mut self.end_time,
            &mut self.model,
            &mut self.cli_version,
            &mut self.working_directory,
            &mut self.git_branch,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Content blocks in this message
    pub content: Vec<ContentBlock>,

    /// Timestamp of the message, as recorded by the tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// 0-based position in the finalized message list
    #[serde(default)]
    pub index: usize,
}

impl Message {
    /// Iterate over tool call blocks in this message
    pub fn tool_calls(&self) -> impl Iterator<Item = &ContentBlock> {
        self.content.iter().filter(|b| b.is_tool_call())
    }

    /// Concatenated text of all text blocks, newline separated
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::ToolCall { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of parsing one transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParsedSession {
    pub messages: Vec<Message>,
    pub metadata: SessionMetadata,
}
