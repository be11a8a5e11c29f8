//! Built-in redaction rules
//!
//! The list is ordered: rules run one after another over the partially
//! redacted text, so specific vendor formats come before the generic
//! assignment and PII shapes that would otherwise claim the same span.
//! Value classes of the generic rules exclude `[` and `]` so an earlier
//! `[REDACTED]` label is never matched again.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Rule names skipped when the text is tool input or output
pub const TOOL_OUTPUT_SKIPPED_RULES: &[&str] = &["Home Directory", "IPv4 Address", "Email Address"];

/// A named redaction rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationRule {
    /// Name reported in redaction counts
    pub name: String,
    /// Regex whose every match is replaced
    pub pattern: String,
    /// The rule only runs when the current text also matches this regex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Skip this rule for tool call input and output
    #[serde(default)]
    pub skip_in_tool_output: bool,
}

impl SanitizationRule {
    /// Create a rule that applies everywhere
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            context: None,
            skip_in_tool_output: false,
        }
    }

    /// Gate the rule on a context regex
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Exclude the rule from tool call input and output
    pub fn skipped_in_tool_output(mut self) -> Self {
        self.skip_in_tool_output = true;
        self
    }
}

fn rule(name: &str, pattern: &str) -> SanitizationRule {
    let rule = SanitizationRule::new(name, pattern);
    if TOOL_OUTPUT_SKIPPED_RULES.contains(&name) {
        rule.skipped_in_tool_output()
    } else {
        rule
    }
}

/// Built-in rules, in application order
pub static BUILTIN_RULES: Lazy<Vec<SanitizationRule>> = Lazy::new(|| {
    vec![
        // Vendor API keys and tokens
        rule("Anthropic API Key", r"\bsk-ant-[A-Za-z0-9_\-]{20,}"),
        rule("OpenRouter API Key", r"\bsk-or-(?:v1-)?[A-Za-z0-9]{32,}"),
        rule("OpenAI API Key", r"\bsk-(?:proj-|svcacct-|admin-)?[A-Za-z0-9_\-]{20,}"),
        rule("GitHub Token", r"\bgh[pousr]_[A-Za-z0-9]{36,}"),
        rule("GitHub Fine-Grained Token", r"\bgithub_pat_[A-Za-z0-9_]{22,}"),
        rule("GitLab Token", r"\bglpat-[A-Za-z0-9_\-]{20,}"),
        rule("AWS Access Key ID", r"\b(?:AKIA|ASIA|AGPA|AIDA|AROA|ANPA|ANVA|AIPA)[A-Z0-9]{16}\b"),
        rule("AWS Secret Access Key", r"\b[A-Za-z0-9/+]{40}\b").with_context(r"(?i)aws_?secret"),
        rule("Google API Key", r"\bAIza[0-9A-Za-z_\-]{35}"),
        rule("Google OAuth Token", r"\bya29\.[0-9A-Za-z_\-]{20,}"),
        rule("Slack Token", r"\bxox[baprs]-[0-9A-Za-z\-]{10,}"),
        rule("Slack Webhook", r"https://hooks\.slack\.com/services/[A-Za-z0-9/_\-]+"),
        rule(
            "Discord Webhook",
            r"https://(?:ptb\.|canary\.)?discord(?:app)?\.com/api/webhooks/[0-9]+/[A-Za-z0-9_\-]+",
        ),
        rule("Stripe Key", r"\b(?:sk|rk|pk)_(?:live|test)_[0-9A-Za-z]{24,}"),
        rule("Twilio API Key", r"\bSK[0-9a-fA-F]{32}\b"),
        rule("SendGrid API Key", r"\bSG\.[A-Za-z0-9_\-]{22}\.[A-Za-z0-9_\-]{43}"),
        rule("Mailgun API Key", r"\bkey-[0-9a-zA-Z]{32}\b"),
        rule("npm Token", r"\bnpm_[A-Za-z0-9]{36}\b"),
        rule("PyPI Token", r"\bpypi-AgEIcHlwaS5vcmc[A-Za-z0-9_\-]{50,}"),
        rule("Hugging Face Token", r"\bhf_[A-Za-z0-9]{34,}\b"),
        rule(
            "Heroku API Key",
            r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
        )
        .with_context(r"(?i)heroku"),
        rule("DigitalOcean Token", r"\bdo[opr]_v1_[a-f0-9]{64}\b"),
        rule("Shopify Token", r"\bshp(?:at|ca|pa|ss)_[a-fA-F0-9]{32}\b"),
        rule("Databricks Token", r"\bdapi[a-f0-9]{32}\b"),
        rule("Azure Storage Key", r"(?i)AccountKey=[A-Za-z0-9+/=]{40,}"),
        rule("Linear API Key", r"\blin_api_[A-Za-z0-9]{40}\b"),
        rule("Groq API Key", r"\bgsk_[A-Za-z0-9]{48,}\b"),
        rule("Replicate API Token", r"\br8_[A-Za-z0-9]{37,}\b"),
        rule("Telegram Bot Token", r"\b[0-9]{8,10}:[A-Za-z0-9_\-]{35}"),
        // Structured credentials
        rule("JWT", r"\beyJ[A-Za-z0-9_\-]+\.eyJ[A-Za-z0-9_\-]+\.[A-Za-z0-9_\-]+"),
        rule("Bearer Token", r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]{20,}=*"),
        rule("Basic Auth", r"(?i)\bbasic\s+[A-Za-z0-9+/]{16,}={0,2}").with_context(r"(?i)authorization"),
        rule(
            "Private Key",
            r"-----BEGIN (?:[A-Z]+ )*PRIVATE KEY-----[\s\S]*?-----END (?:[A-Z]+ )*PRIVATE KEY-----",
        ),
        rule(
            "Database Connection String",
            r"\b(?:postgres(?:ql)?|mysql|mongodb(?:\+srv)?|rediss?|amqps?|mssql)://[^\s:/@]+:[^\s@]+@[^\s'<>]+",
        ),
        rule("URL Credentials", r"\bhttps?://[^\s:/@\[\]]+:[^\s@/\[\]]+@[^\s'<>]+"),
        // Generic assignments
        rule(
            "Environment Secret",
            r#"\b[A-Z][A-Z0-9_]*(?:SECRET|TOKEN|PASSWORD|PASSWD|API_KEY|APIKEY|PRIVATE_KEY|ACCESS_KEY|CREDENTIALS?)[A-Z0-9_]*\s*=\s*["']?[^\s"'\[\]]{8,}["']?"#,
        ),
        rule(
            "Password Assignment",
            r#"(?i)\b(?:password|passwd|pwd)\s*[:=]\s*["']?[^\s"',;\[\]]{4,}["']?"#,
        ),
        rule(
            "Secret Assignment",
            r#"(?i)\b(?:secret|api[_\-]?key|access[_\-]?token|auth[_\-]?token|client[_\-]?secret)\s*[:=]\s*["']?[^\s"',;\[\]]{8,}["']?"#,
        ),
        // Personal data
        rule(
            "Credit Card Number",
            r"\b(?:4[0-9]{3}|5[1-5][0-9]{2}|6011)(?:[ \-]?[0-9]{4}){3}\b|\b3[47][0-9]{2}[ \-]?[0-9]{6}[ \-]?[0-9]{5}\b",
        ),
        rule("US SSN", r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b").with_context(r"(?i)\bssn\b|social security"),
        rule("Email Address", r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b"),
        rule(
            "IPv4 Address",
            r"\b(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\b",
        ),
        rule("IPv6 Address", r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b"),
        rule(
            "Home Directory",
            r"/(?:Users|home)/[A-Za-z0-9._\-]+|\b[A-Za-z]:\\Users\\[A-Za-z0-9._\-]+",
        ),
    ]
});
