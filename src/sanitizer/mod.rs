//! Sensitive data scrubber
//!
//! Regex-driven redaction of secrets and personal data from parsed sessions.
//! Built-in rules cover vendor API keys, structured credentials and common
//! PII; custom rules can be added through [`SanitizerConfig`].

mod config;
mod engine;
mod error;
mod patterns;

pub use config::{validate_pattern, validate_rule, SanitizerConfig};
pub use engine::{scrub, scrub_text, Redaction, RedactionTally, Sanitizer, ScrubResult, REDACTED};
pub use error::SanitizerError;
pub use patterns::{SanitizationRule, BUILTIN_RULES, TOOL_OUTPUT_SKIPPED_RULES};


#[cfg(test)]
mod extended_tests;
