//! Sanitizer configuration
//!
//! Lets the host switch built-in rules off by name and append its own rules
//! after them. The configuration is plain JSON; reading and storing it is the
//! host's business.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::engine::Sanitizer;
use super::error::SanitizerError;
use super::patterns::{SanitizationRule, BUILTIN_RULES};

/// Rule selection for a [`Sanitizer`]
///
/// The default configuration yields exactly the built-in rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Built-in rule names to leave out
    pub disabled_rules: Vec<String>,
    /// Extra rules, run after the built-ins in the order given
    pub custom_rules: Vec<SanitizationRule>,
}

impl SanitizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, SanitizerError> {
        serde_json::from_str(json)
            .map_err(|e| SanitizerError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Switch a built-in rule off
    pub fn disable(&mut self, rule_name: &str) {
        if !self.disabled_rules.iter().any(|n| n == rule_name) {
            self.disabled_rules.push(rule_name.to_string());
        }
    }

    /// Append a custom rule after validating it
    ///
    /// Names must be non-empty and unique among custom rules, and both the
    /// pattern and the optional context must compile.
    pub fn add_custom_rule(&mut self, rule: SanitizationRule) -> Result<(), SanitizerError> {
        validate_rule(&rule)?;
        if self.custom_rules.iter().any(|r| r.name == rule.name) {
            return Err(SanitizerError::Config(format!(
                "Custom rule '{}' already exists",
                rule.name
            )));
        }
        self.custom_rules.push(rule);
        Ok(())
    }

    /// Remove a custom rule by name
    pub fn remove_custom_rule(&mut self, rule_name: &str) -> Result<(), SanitizerError> {
        let before = self.custom_rules.len();
        self.custom_rules.retain(|r| r.name != rule_name);
        if self.custom_rules.len() == before {
            return Err(SanitizerError::Config(format!(
                "Custom rule '{}' not found",
                rule_name
            )));
        }
        Ok(())
    }

    /// Enabled built-ins in order, then the custom rules
    pub fn merged_rules(&self) -> Vec<SanitizationRule> {
        BUILTIN_RULES
            .iter()
            .filter(|r| !self.disabled_rules.contains(&r.name))
            .cloned()
            .chain(self.custom_rules.iter().cloned())
            .collect()
    }

    /// Compile the configuration into a sanitizer
    ///
    /// Unknown names in `disabled_rules` are rejected so a typo cannot
    /// silently leave a rule on.
    pub fn build(&self) -> Result<Sanitizer, SanitizerError> {
        if let Some(unknown) = self
            .disabled_rules
            .iter()
            .find(|name| !BUILTIN_RULES.iter().any(|r| &r.name == *name))
        {
            return Err(SanitizerError::Config(format!(
                "Unknown built-in rule '{}'",
                unknown
            )));
        }
        for rule in &self.custom_rules {
            validate_rule(rule)?;
        }
        Sanitizer::new(self.merged_rules())
    }
}

/// Check that a rule has a name and that its regexes compile
pub fn validate_rule(rule: &SanitizationRule) -> Result<(), SanitizerError> {
    if rule.name.trim().is_empty() {
        return Err(SanitizerError::Config("Rule name cannot be empty".to_string()));
    }
    validate_pattern(&rule.pattern)?;
    if let Some(context) = &rule.context {
        validate_pattern(context)?;
    }
    Ok(())
}

/// Check that a pattern is non-empty and compiles
pub fn validate_pattern(pattern: &str) -> Result<(), SanitizerError> {
    if pattern.trim().is_empty() {
        return Err(SanitizerError::Config("Regex pattern cannot be empty".to_string()));
    }
    Regex::new(pattern)?;
    Ok(())
}
