//! The in-memory owners model and its equality semantics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rule::Rule;

/// An ordered list of [`Rule`]s.
///
/// Order is kept for compilation (output order equals input order) but is
/// irrelevant for [`Ruleset::equal`]. Duplicate patterns are legal and
/// preserved.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ruleset {
    rules: Vec<Rule>,
}

impl Ruleset {
    /// Parse owners file text. See [`crate::parse`].
    pub fn parse(content: &str) -> Self {
        crate::parser::parse(content)
    }

    /// Parse raw owners file bytes. See [`crate::parse_bytes`].
    pub fn parse_bytes(content: &[u8]) -> Self {
        crate::parser::parse_bytes(content)
    }

    /// Create an empty ruleset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the ruleset holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Iterate rules in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Rules as a slice, in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Compile this ruleset into owners file content.
    ///
    /// Shorthand for [`compile(Some(self))`](crate::compile); always emits the
    /// generated header, even when the ruleset is empty.
    pub fn compile(&self) -> Vec<u8> {
        crate::writer::compile(Some(self))
    }

    /// Semantic equality, independent of rule order.
    ///
    /// Rulesets of different lengths are never equal. Otherwise every rule in
    /// `self` must be paired with a distinct rule in `other` that has the same
    /// pattern and the same owners as a multiset (owner order is ignored,
    /// owner multiplicity is not).
    ///
    /// Pairing rules one-to-one keeps the comparison symmetric when patterns
    /// repeat: `[p:a, p:a]` is not equal to `[p:a, q:b]`.
    pub fn equal(&self, other: &Ruleset) -> bool {
        self.len() == other.len() && self.missing_from(other).is_empty()
    }

    /// Rules of `self` left over after pairing each one with a distinct,
    /// equal rule of `other`.
    ///
    /// Uses the same rule equality as [`Ruleset::equal`], so owner order is
    /// ignored and a rule repeated twice needs two counterparts.
    pub fn missing_from<'a>(&'a self, other: &Ruleset) -> Vec<&'a Rule> {
        let mut claimed = vec![false; other.len()];
        let mut missing = Vec::new();
        for rule in &self.rules {
            let found = other.rules.iter().enumerate().position(|(index, candidate)| {
                !claimed[index]
                    && candidate.pattern == rule.pattern
                    && same_owners(&rule.owners, &candidate.owners)
            });

            match found {
                Some(index) => claimed[index] = true,
                None => missing.push(rule),
            }
        }

        missing
    }
}

impl PartialEq for Ruleset {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl From<Vec<Rule>> for Ruleset {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<Rule> for Ruleset {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Ruleset {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ruleset {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Compare two owner lists as multisets.
///
/// Order is ignored; each owner must appear the same number of times in both.
pub fn same_owners<S: AsRef<str>>(left: &[S], right: &[S]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(left.len());
    for owner in left {
        *counts.entry(owner.as_ref()).or_default() += 1;
    }

    for owner in right {
        match counts.get_mut(owner.as_ref()) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                counts.remove(owner.as_ref());
            }
            None => return false,
        }
    }

    counts.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(entries: &[(&str, &[&str])]) -> Ruleset {
        entries
            .iter()
            .map(|(pattern, owners)| Rule::new(*pattern, owners.iter().copied()))
            .collect()
    }

    #[test]
    fn test_equal_is_reflexive() {
        let ruleset = rules(&[("*.rs", &["alice", "bob"]), ("docs/", &["carol"])]);
        assert!(ruleset.equal(&ruleset));
    }

    #[test]
    fn test_equal_ignores_rule_order() {
        let a = rules(&[("*.rs", &["alice"]), ("docs/", &["carol"])]);
        let b = rules(&[("docs/", &["carol"]), ("*.rs", &["alice"])]);
        assert!(a.equal(&b));
    }

    #[test]
    fn test_equal_ignores_owner_order() {
        let a = rules(&[("p", &["a", "b"])]);
        let b = rules(&[("p", &["b", "a"])]);
        assert!(a.equal(&b));
    }

    #[test]
    fn test_equal_respects_owner_multiplicity() {
        let a = rules(&[("p", &["a", "a"])]);
        let b = rules(&[("p", &["a"])]);
        assert!(!a.equal(&b));
        assert!(!b.equal(&a));
    }

    #[test]
    fn test_equal_length_mismatch() {
        let empty = Ruleset::new();
        let one = rules(&[("p", &["a"])]);
        assert!(!empty.equal(&one));
        assert!(!one.equal(&empty));
    }

    #[test]
    fn test_equal_missing_pattern() {
        let a = rules(&[("p", &["a"])]);
        let b = rules(&[("q", &["a"])]);
        assert!(!a.equal(&b));
    }

    #[test]
    fn test_equal_duplicate_patterns_are_paired_one_to_one() {
        let a = rules(&[("p", &["a"]), ("p", &["a"])]);
        let b = rules(&[("p", &["a"]), ("q", &["b"])]);
        assert!(!a.equal(&b));
        assert!(!b.equal(&a));
    }

    #[test]
    fn test_equal_duplicate_patterns_with_different_owners() {
        let a = rules(&[("p", &["a"]), ("p", &["b"])]);
        let b = rules(&[("p", &["b"]), ("p", &["a"])]);
        assert!(a.equal(&b));
    }

    #[test]
    fn test_partial_eq_delegates_to_equal() {
        let a = rules(&[("p", &["a", "b"])]);
        let b = rules(&[("p", &["b", "a"])]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_from_ignores_owner_order() {
        let current = rules(&[("docs/", &["bob", "alice"]), ("*.rs", &["carol"])]);
        let desired = rules(&[("docs/", &["alice", "bob"]), ("*.rs", &["dave"])]);

        let missing: Vec<&str> = current
            .missing_from(&desired)
            .iter()
            .map(|rule| rule.pattern.as_str())
            .collect();
        assert_eq!(missing, vec!["*.rs"]);
        assert_eq!(desired.missing_from(&current).len(), 1);
    }

    #[test]
    fn test_missing_from_counts_repeated_rules() {
        let a = rules(&[("p", &["a"]), ("p", &["a"])]);
        let b = rules(&[("p", &["a"])]);
        assert_eq!(a.missing_from(&b).len(), 1);
        assert!(b.missing_from(&a).is_empty());
    }

    #[test]
    fn test_associated_parse_matches_free_functions() {
        let text = "# comment\n*.rs @alice bob\ndocs/ carol@example.com\n";
        let parsed = Ruleset::parse(text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.rules(), crate::parse(text).rules());
        assert_eq!(Ruleset::parse_bytes(text.as_bytes()).rules(), parsed.rules());
    }

    #[test]
    fn test_same_owners() {
        assert!(same_owners(&["a", "b", "a"], &["a", "a", "b"]));
        assert!(!same_owners(&["a", "b", "b"], &["a", "a", "b"]));
        assert!(same_owners::<&str>(&[], &[]));
        assert!(!same_owners(&["a"], &["b"]));
    }
}
