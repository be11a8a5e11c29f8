//! Normalized session data models
//!
//! Defines the ParsedSession structure and related types that every
//! transcript parser emits, independent of the producing tool.

mod content_block;
mod types;

// Re-export all public types
pub use content_block::ContentBlock;
pub use types::{Message, ParsedSession, Role, SessionMetadata};
