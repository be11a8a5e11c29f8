//! JSON Lines and whole-document readers
//!
//! Transcripts are read fully into memory. Each line is parsed independently;
//! a line that is not valid JSON (or nests too deeply) is an expected outcome
//! and is simply left out of the record stream.

use serde_json::Value;
use tracing::trace;

use super::ParseError;

/// Maximum nesting depth accepted for a single record or document
pub const MAX_JSON_DEPTH: usize = 50;

/// Parse one line into a JSON value, or `None` if it is empty, malformed or too deep
pub fn parse_line(line: &str) -> Option<Value> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(line) {
        Ok(value) if json_depth(&value) <= MAX_JSON_DEPTH => Some(value),
        Ok(_) => {
            trace!(max = MAX_JSON_DEPTH, "skipping over-nested JSONL line");
            None
        }
        Err(e) => {
            trace!(error = %e, "skipping unparseable JSONL line");
            None
        }
    }
}

/// Iterate over the JSON object records of a JSONL text
///
/// Non-object values and unparseable lines are skipped silently. The iterator
/// borrows `content` and can be recreated as often as needed.
pub fn read_json_lines(content: &str) -> impl Iterator<Item = Value> + '_ {
    content
        .lines()
        .filter_map(parse_line)
        .filter(Value::is_object)
}

/// Parse the whole text as a single JSON document
pub fn read_whole_document(content: &str) -> Result<Value, ParseError> {
    let value: Value = serde_json::from_str(content.trim())?;
    if json_depth(&value) > MAX_JSON_DEPTH {
        return Err(ParseError::TooDeep { max: MAX_JSON_DEPTH });
    }
    Ok(value)
}

/// Nesting depth of a JSON value (scalars are depth 0)
///
/// serde_json already refuses documents deeper than its own recursion limit,
/// so the recursion here is bounded.
fn json_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(json_depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(json_depth).max().unwrap_or(0),
        _ => 0,
    }
}
