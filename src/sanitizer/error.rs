//! Sanitizer error types

use thiserror::Error;

/// Errors raised while building a sanitizer
#[derive(Debug, Error)]
pub enum SanitizerError {
    /// A rule (or its context) is not a valid regular expression
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The configuration is malformed or inconsistent
    #[error("Invalid sanitizer config: {0}")]
    Config(String),
}
