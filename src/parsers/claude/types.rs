//! Claude-specific type definitions
//!
//! Contains deserialization structures for the `message` payload of Claude
//! Code's JSONL records. Blocks are decoded one at a time so a single block
//! of an unexpected shape does not hide the rest of the message.

use serde::Deserialize;
use serde_json::Value;

use crate::parsers::{join_text_parts, json_to_text};

/// The `message` object of a `user`/`assistant` record
#[derive(Debug, Default, Deserialize)]
pub struct ClaudeMessage {
    /// Message content (can be string or array)
    #[serde(default)]
    pub content: Option<ClaudeContent>,

    /// Model name (assistant messages only)
    #[serde(default)]
    pub model: Option<String>,
}

/// Claude content can be either a simple string or an array of content blocks
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClaudeContent {
    /// Simple text content
    Text(String),
    /// Array of raw content blocks
    Blocks(Vec<Value>),
}

impl ClaudeContent {
    /// Decode every recognizable block, skipping the rest
    pub fn blocks(&self) -> Vec<ClaudeContentBlock> {
        match self {
            Self::Text(text) => vec![ClaudeContentBlock::Text { text: text.clone() }],
            Self::Blocks(raw) => raw
                .iter()
                .filter_map(|b| serde_json::from_value(b.clone()).ok())
                .collect(),
        }
    }
}

/// Individual content block in Claude format
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaudeContentBlock {
    /// Plain text
    Text { text: String },

    /// Thinking/reasoning content
    Thinking {
        #[serde(default)]
        thinking: String,
    },

    /// Tool use request
    ToolUse {
        #[serde(default)]
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },

    /// Tool result
    ToolResult {
        #[serde(default)]
        tool_use_id: String,
        #[serde(default)]
        content: ClaudeToolResultContent,
    },

    /// Images, documents and anything newer
    #[serde(other)]
    Other,
}

/// Tool result content can be a string or a list of parts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClaudeToolResultContent {
    Text(String),
    Parts(Vec<Value>),
    Structured(Value),
}

impl Default for ClaudeToolResultContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl ClaudeToolResultContent {
    /// Flatten to text; list parts contribute their `text`, newline separated
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Parts(parts) => join_text_parts(parts, &["text"]),
            Self::Structured(v) => json_to_text(v),
        }
    }
}
