//! Ordered regex rule tables for shell commands and file paths.
//!
//! Tables are evaluated in declaration order and the first match wins.
//! Built-in rules come first; user rules from configuration are
//! appended after them.

use regex::Regex;

use crate::config::RuleSpec;
use crate::{Error, Result};

/// A compiled (pattern, reason) pair.
#[derive(Debug, Clone)]
pub struct SecurityRule {
    pattern: Regex,
    reason: String,
}

impl SecurityRule {
    pub fn new(pattern: &str, reason: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            reason: reason.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl TryFrom<&RuleSpec> for SecurityRule {
    type Error = Error;

    fn try_from(spec: &RuleSpec) -> Result<Self> {
        Self::new(&spec.pattern, &spec.reason)
    }
}

const BUILTIN_COMMAND_RULES: &[(&str, &str)] = &[
    (r"rm\s+-rf\s+/(?:\s|$)", "Attempting to delete root filesystem"),
    (r"rm\s+-rf\s+~", "Attempting to delete home directory"),
    (r":\(\)\s*\{\s*:\|\s*:\s*&\s*\}\s*;", "Fork bomb detected"),
    (r"dd\s+if=/dev/zero\s+of=/dev/[sh]da", "Attempting to overwrite disk"),
    (r"mkfs\.\w+\s+/dev/[sh]da(?:\d+)?", "Attempting to format system disk"),
    (r">\s*/dev/[sh]da", "Attempting to write directly to disk"),
    (r"chmod\s+777\s+/", "Making root filesystem world-writable"),
    (r"curl.*\|\s*(?:bash|sh)", "Piping untrusted scripts to shell"),
    (r"wget.*\|\s*(?:bash|sh)", "Piping untrusted scripts to shell"),
    (r"sudo\s+rm\s+-rf", "Sudo recursive force delete"),
    (r"chmod\s+-R\s+777", "Recursive world-writable permissions"),
    (r"kill\s+-9\s+1(?:\s|$)", "Killing the init process"),
];

const BUILTIN_SENSITIVE_PATHS: &[(&str, &str)] = &[
    (r"/etc/passwd", "System password file"),
    (r"/etc/shadow", "System shadow file"),
    (r"\.ssh/id_[rd]sa", "SSH private key"),
    (r"\.aws/credentials", "AWS credentials"),
    (r"\.env$", "Environment variables file"),
    (r"private\.key", "Private key file"),
    (r"(?i)secret", "Secrets file"),
];

/// An ordered, appendable list of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<SecurityRule>,
}

impl RuleTable {
    fn from_static(entries: &[(&str, &str)]) -> Result<Self> {
        let rules = entries
            .iter()
            .map(|(pattern, reason)| SecurityRule::new(pattern, reason))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn builtin_commands() -> Result<Self> {
        Self::from_static(BUILTIN_COMMAND_RULES)
    }

    pub fn builtin_sensitive_paths() -> Result<Self> {
        Self::from_static(BUILTIN_SENSITIVE_PATHS)
    }

    pub fn push(&mut self, rule: SecurityRule) {
        self.rules.push(rule);
    }

    /// Compile and append user rules. Nothing is appended if any fails.
    pub fn extend_from_specs(&mut self, specs: &[RuleSpec]) -> Result<()> {
        let compiled = specs
            .iter()
            .map(SecurityRule::try_from)
            .collect::<Result<Vec<_>>>()?;
        self.rules.extend(compiled);
        Ok(())
    }

    /// First rule matching `text`, in declaration order.
    pub fn first_match(&self, text: &str) -> Option<&SecurityRule> {
        self.rules.iter().find(|rule| rule.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
