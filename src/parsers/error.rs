//! Error types for transcript parsing
//!
//! Parsing itself is best-effort and never fails: malformed lines are skipped
//! and missing fields are treated as absent. The only errors are whole-document
//! JSON failures (recovered by the callers that use them) and an explicitly
//! requested tool that is not supported.

use thiserror::Error;

/// Errors that can occur during transcript parsing
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON parsing failed
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Document nests deeper than the reader accepts
    #[error("JSON nesting exceeds maximum depth of {max}")]
    TooDeep { max: usize },

    /// Caller named a tool that has no parser
    #[error("Unknown tool '{name}'. Supported tools: {}", supported.join(", "))]
    UnknownTool { name: String, supported: Vec<String> },
}

impl ParseError {
    /// Create an UnknownTool error listing the given supported identifiers
    pub fn unknown_tool<S: AsRef<str>>(name: impl Into<String>, supported: &[S]) -> Self {
        Self::UnknownTool {
            name: name.into(),
            supported: supported.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}
