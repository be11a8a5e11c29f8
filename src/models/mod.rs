//! Session data models
//!
//! This module defines the canonical conversation structure that transcripts
//! from every supported coding agent are normalized into.

pub mod session;

pub use session::*;
