//! Sanitizer engine
//!
//! Rules are applied as a fold over the ordered rule list: each rule sees the
//! text as left by the rules before it, so a span redacted early can never be
//! claimed (or counted) by a later, more generic rule.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::error::SanitizerError;
use super::patterns::{SanitizationRule, BUILTIN_RULES};
use crate::models::{ContentBlock, ParsedSession};

/// Label substituted for every match
pub const REDACTED: &str = "[REDACTED]";

/// Number of replacements made by one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redaction {
    pub pattern_name: String,
    pub count: usize,
}

/// A scrubbed copy of a session plus what was redacted from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubResult {
    pub scrubbed_data: ParsedSession,
    /// Sorted by descending count
    pub redactions: Vec<Redaction>,
}

/// Per-rule replacement counter, in order of first redaction
#[derive(Debug, Default)]
pub struct RedactionTally {
    counts: IndexMap<String, usize>,
}

impl RedactionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` replacements for `name`
    pub fn record(&mut self, name: &str, count: usize) {
        if count == 0 {
            return;
        }
        *self.counts.entry(name.to_string()).or_insert(0) += count;
    }

    /// Total replacements across all rules
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Redactions sorted by descending count; ties keep first-seen order
    pub fn into_redactions(self) -> Vec<Redaction> {
        let mut redactions: Vec<Redaction> = self
            .counts
            .into_iter()
            .map(|(pattern_name, count)| Redaction { pattern_name, count })
            .collect();
        redactions.sort_by(|a, b| b.count.cmp(&a.count));
        redactions
    }
}

#[derive(Debug)]
struct CompiledRule {
    name: String,
    regex: Regex,
    context: Option<Regex>,
    skip_in_tool_output: bool,
}

impl CompiledRule {
    fn compile(rule: &SanitizationRule) -> Result<Self, SanitizerError> {
        Ok(Self {
            name: rule.name.clone(),
            regex: Regex::new(&rule.pattern)?,
            context: rule.context.as_deref().map(Regex::new).transpose()?,
            skip_in_tool_output: rule.skip_in_tool_output,
        })
    }
}

/// Compiled, ordered rule set
#[derive(Debug)]
pub struct Sanitizer {
    rules: Vec<CompiledRule>,
}

impl Sanitizer {
    /// Compile `rules`, keeping their order
    pub fn new(rules: Vec<SanitizationRule>) -> Result<Self, SanitizerError> {
        let rules = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Sanitizer over the built-in rules
    pub fn with_defaults() -> Result<Self, SanitizerError> {
        Self::new(BUILTIN_RULES.clone())
    }

    /// Built-in rules followed by `custom_rules`
    pub fn with_custom_rules(custom_rules: Vec<SanitizationRule>) -> Result<Self, SanitizerError> {
        let mut rules = BUILTIN_RULES.clone();
        rules.extend(custom_rules);
        Self::new(rules)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Rule names in application order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Run every applicable rule over `text`, recording replacements in `tally`
    ///
    /// With `tool_output` set, rules flagged `skip_in_tool_output` are not run.
    pub fn sanitize(&self, text: &str, tool_output: bool, tally: &mut RedactionTally) -> String {
        self.rules.iter().fold(text.to_string(), |current, rule| {
            if tool_output && rule.skip_in_tool_output {
                return current;
            }
            if let Some(context) = &rule.context {
                if !context.is_match(&current) {
                    trace!(rule = %rule.name, "context not present, rule skipped");
                    return current;
                }
            }

            let count = rule.regex.find_iter(&current).count();
            if count == 0 {
                return current;
            }
            tally.record(&rule.name, count);
            rule.regex.replace_all(&current, NoExpand(REDACTED)).into_owned()
        })
    }

    /// Scrub a bare string with every rule, ignoring the tool-output skip set
    pub fn scrub_text(&self, text: &str) -> String {
        self.sanitize(text, false, &mut RedactionTally::new())
    }

    /// Scrub a copy of `session`; the caller's session is left untouched
    ///
    /// Text blocks are scrubbed as conversation text. A tool call's input is
    /// scrubbed in tool-output context just like its output, so the rules in
    /// the skip set leave both alone.
    pub fn scrub_session(&self, session: &ParsedSession) -> ScrubResult {
        let mut scrubbed = session.clone();
        let mut tally = RedactionTally::new();

        for block in scrubbed.messages.iter_mut().flat_map(|m| m.content.iter_mut()) {
            let tool_output = block.is_tool_call();
            match block {
                ContentBlock::Text { text } => {
                    *text = self.sanitize(text, false, &mut tally);
                }
                ContentBlock::ToolCall { input, output, .. } => {
                    for field in [input, output].into_iter().flatten() {
                        *field = self.sanitize(field, tool_output, &mut tally);
                    }
                }
            }
        }

        if !tally.is_empty() {
            debug!(total = tally.total(), "redacted sensitive data from session");
        }
        for (name, count) in &tally.counts {
            trace!(rule = %name, count, "redactions");
        }

        ScrubResult {
            scrubbed_data: scrubbed,
            redactions: tally.into_redactions(),
        }
    }
}

static DEFAULT_SANITIZER: Lazy<Sanitizer> =
    Lazy::new(|| Sanitizer::with_defaults().expect("built-in sanitizer rules must compile"));

/// Scrub a copy of `session` with the built-in rules
pub fn scrub(session: &ParsedSession) -> ScrubResult {
    DEFAULT_SANITIZER.scrub_session(session)
}

/// Scrub a bare string with the built-in rules
pub fn scrub_text(text: &str) -> String {
    DEFAULT_SANITIZER.scrub_text(text)
}
