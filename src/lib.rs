// Agent Transcripts Library
// Normalizes AI coding-agent session exports and scrubs sensitive data from them

pub mod models;
pub mod parsers;
pub mod sanitizer;

pub use models::{ContentBlock, Message, ParsedSession, Role, SessionMetadata};
pub use parsers::{detect, detect_and_parse, parse_with_tool, LogParser, ParseError, ToolId};
pub use sanitizer::{scrub, scrub_text, Redaction, Sanitizer, SanitizerConfig, SanitizerError, ScrubResult};
