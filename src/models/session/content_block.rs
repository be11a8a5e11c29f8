//! Content block types
//!
//! Contains the ContentBlock enum for representing the atomic units of
//! message content: plain text and tool calls.

use serde::{Deserialize, Serialize};

/// Content block types in a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content
    Text { text: String },

    /// Tool invocation, optionally carrying its (truncated) result
    ToolCall {
        name: String,
        /// Summary or truncated JSON of the tool arguments
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<String>,
        /// Truncated tool result; absent until a matching result record is seen
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        /// Vendor call id, only kept by formats that correlate results by id
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call_id: Option<String>,
    },
}

impl ContentBlock {
    /// Whether this is a tool call still waiting for its output
    pub fn is_open_tool_call(&self) -> bool {
        matches!(self, Self::ToolCall { output: None, .. })
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self, Self::ToolCall { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// Call id of a tool call block
    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Self::ToolCall { tool_call_id, .. } => tool_call_id.as_deref(),
            Self::Text { .. } => None,
        }
    }

    /// Attach an output to an open tool call.
    ///
    /// Returns `false` (and leaves the block untouched) for text blocks and
    /// tool calls that already have an output.
    pub fn fill_output(&mut self, value: String) -> bool {
        match self {
            Self::ToolCall { output, .. } if output.is_none() => {
                *output = Some(value);
                true
            }
            _ => false,
        }
    }
}
