//! A single pattern-to-owners rule.

use serde::{Deserialize, Serialize};

/// One line of an owners file.
///
/// Owners are stored without the `@` sigil. Usernames get it back when the
/// rule is compiled; email addresses never carry one.
///
/// `PartialEq` on a single rule is structural (owner order matters). Use
/// [`Ruleset::equal`](crate::Ruleset::equal) for the order-independent comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// File-glob-like pattern. Stored and compared as plain text.
    pub pattern: String,

    /// Usernames or email addresses, in declaration order.
    #[serde(default, alias = "usernames")]
    pub owners: Vec<String>,
}

impl Rule {
    /// Create a rule from a pattern and owners, taken as given.
    pub fn new<I, S>(pattern: impl Into<String>, owners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pattern: pattern.into(),
            owners: owners.into_iter().map(Into::into).collect(),
        }
    }

    /// Owners rendered the way they appear in a generated file.
    ///
    /// Identifiers without an `@` are usernames and are prefixed with one;
    /// anything already containing `@` (emails, `@org/team`) passes through.
    pub fn owner_tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.owners.iter().map(|owner| {
            if owner.contains('@') {
                owner.clone()
            } else {
                format!("@{owner}")
            }
        })
    }
}

/// Strip a single leading `@` from an owner token.
pub fn normalize_owner(token: &str) -> &str {
    token.strip_prefix('@').unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_tokens_prefix_usernames_only() {
        let rule = Rule::new("*.rs", ["alice", "bob@example.com"]);
        let tokens: Vec<String> = rule.owner_tokens().collect();
        assert_eq!(tokens, vec!["@alice", "bob@example.com"]);
    }

    #[test]
    fn test_normalize_owner() {
        assert_eq!(normalize_owner("@alice"), "alice");
        assert_eq!(normalize_owner("alice"), "alice");
        assert_eq!(normalize_owner("@org/team"), "org/team");
        assert_eq!(normalize_owner("@@odd"), "@odd");
    }

    #[test]
    fn test_rule_deserializes_legacy_usernames_key() {
        let rule: Rule = toml::from_str("pattern = \"*\"\nusernames = [\"alice\"]\n").unwrap();
        assert_eq!(rule, Rule::new("*", ["alice"]));
    }
}
