//! Desired rules document.
//!
//! ```toml
//! [[rule]]
//! pattern = "*"
//! owners = ["@acme/platform"]
//!
//! [[rule]]
//! pattern = "/docs/"
//! owners = ["alice", "docs@example.com"]
//! ```

use std::path::Path;

use owners_rules::{Rule, Ruleset, normalize_owner};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Rules an owners file should contain, as written by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRules {
    #[serde(default, rename = "rule")]
    pub rules: Vec<Rule>,
}

impl DesiredRules {
    /// Parse a rules document from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a rules document from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Validate the rules and convert them into a [`Ruleset`].
    ///
    /// Owners may be written with or without `@`; the sigil is stripped so
    /// the result compares equal to a parsed file.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRule`] when a pattern is empty or contains whitespace,
    /// or when a rule has no owners. Such rules would not survive a
    /// compile/parse cycle.
    pub fn into_ruleset(self) -> Result<Ruleset> {
        self.rules.into_iter().map(normalize_rule).collect()
    }
}

fn normalize_rule(rule: Rule) -> Result<Rule> {
    let invalid = |reason: &str| Error::InvalidRule {
        pattern: rule.pattern.clone(),
        reason: reason.to_string(),
    };

    if rule.pattern.is_empty() {
        return Err(invalid("pattern is empty"));
    }
    if rule.pattern.chars().any(char::is_whitespace) {
        return Err(invalid("pattern contains whitespace"));
    }
    if rule.pattern.starts_with('#') {
        return Err(invalid("pattern starts a comment"));
    }

    let mut owners = Vec::with_capacity(rule.owners.len());
    for owner in &rule.owners {
        let owner = normalize_owner(owner.trim());
        if owner.is_empty() || owner.starts_with('@') || owner.chars().any(char::is_whitespace) {
            return Err(invalid("owner is empty or contains whitespace"));
        }
        owners.push(owner.to_string());
    }
    if owners.is_empty() {
        return Err(invalid("rule has no owners"));
    }

    Ok(Rule::new(rule.pattern, owners))
}
