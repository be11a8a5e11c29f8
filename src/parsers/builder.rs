//! Shared message and block construction
//!
//! Every format parser builds its output through these helpers so truncation,
//! empty-message dropping, output patching and final indexing behave the same
//! regardless of the source tool.

use tracing::debug;

use crate::models::{ContentBlock, Message, ParsedSession, Role, SessionMetadata};

/// Default length (in characters) above which tool input/output is truncated
pub const DEFAULT_MAX_LENGTH: usize = 2000;

/// Appended to text cut by [`truncate`]
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Build a text block
pub fn text_block(text: impl Into<String>) -> ContentBlock {
    ContentBlock::Text { text: text.into() }
}

/// Build a tool call block
pub fn tool_call_block(
    name: impl Into<String>,
    input: Option<String>,
    output: Option<String>,
    tool_call_id: Option<String>,
) -> ContentBlock {
    ContentBlock::ToolCall {
        name: name.into(),
        input,
        output,
        tool_call_id,
    }
}

/// Wrap blocks into a message; the index is assigned by [`finalize_result`]
pub fn build_message(role: Role, content: Vec<ContentBlock>, timestamp: Option<String>) -> Message {
    Message {
        role,
        content,
        timestamp,
        index: 0,
    }
}

/// Append a message unless it has no content blocks
pub fn push_message(
    messages: &mut Vec<Message>,
    role: Role,
    content: Vec<ContentBlock>,
    timestamp: Option<String>,
) {
    if content.is_empty() {
        return;
    }
    messages.push(build_message(role, content, timestamp));
}

/// Cut `text` to `max_length` characters, appending [`TRUNCATION_MARKER`]
///
/// Lengths are counted in chars so the cut never splits a UTF-8 sequence.
pub fn truncate(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// [`truncate`] with [`DEFAULT_MAX_LENGTH`]
pub fn truncate_default(text: &str) -> String {
    truncate(text, DEFAULT_MAX_LENGTH)
}

/// Attach `output` to the earliest assistant tool call that has none yet
///
/// Returns `false` when every tool call already has an output.
pub fn patch_first_open_tool_call(messages: &mut [Message], output: String) -> bool {
    let slot = messages
        .iter_mut()
        .filter(|m| m.role == Role::Assistant)
        .flat_map(|m| m.content.iter_mut())
        .find(|b| b.is_open_tool_call());

    match slot {
        Some(block) => block.fill_output(output),
        None => {
            debug!("tool result has no open tool call to attach to");
            false
        }
    }
}

/// Attach `output` to the earliest open assistant tool call with the given id
pub fn patch_tool_call_by_id(messages: &mut [Message], id: &str, output: String) -> bool {
    let slot = messages
        .iter_mut()
        .filter(|m| m.role == Role::Assistant)
        .flat_map(|m| m.content.iter_mut())
        .find(|b| b.is_open_tool_call() && b.tool_call_id() == Some(id));

    match slot {
        Some(block) => block.fill_output(output),
        None => {
            debug!(tool_call_id = id, "tool result has no matching open tool call");
            false
        }
    }
}

/// Assign final indices and compact metadata
///
/// Messages without content are dropped before indexing, so `index` always
/// equals the message's position in the returned list.
pub fn finalize_result(messages: Vec<Message>, metadata: SessionMetadata) -> ParsedSession {
    let messages: Vec<Message> = messages
        .into_iter()
        .filter(|m| !m.content.is_empty())
        .enumerate()
        .map(|(index, mut m)| {
            m.index = index;
            m
        })
        .collect();

    let metadata = SessionMetadata {
        total_messages: messages.len(),
        ..metadata
    }
    .compact();

    ParsedSession { messages, metadata }
}
