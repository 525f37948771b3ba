//! Owners file parsing.
//!
//! The format is human-maintained, so parsing is deliberately lenient:
//! nothing here returns an error. Each non-comment line is
//! `pattern owner1 owner2 ...`; lines that do not fit are dropped.

use crate::rule::{Rule, normalize_owner};
use crate::ruleset::Ruleset;

/// Parses owners file content into a [`Ruleset`].
///
/// - Blank lines and lines whose first non-whitespace character is `#` are skipped.
/// - Lines are split on runs of whitespace; the first token is the pattern,
///   every following token is an owner with one leading `@` removed.
/// - Lines with fewer than two tokens are skipped.
///
/// # Example
/// ```
/// use owners_rules::{Rule, parse};
///
/// let ruleset = parse("*.go @alice bob\n# comment\n\ndocs/ carol\n");
/// assert_eq!(
///     ruleset.rules(),
///     &[Rule::new("*.go", ["alice", "bob"]), Rule::new("docs/", ["carol"])]
/// );
/// ```
pub fn parse(content: &str) -> Ruleset {
    let mut ruleset = Ruleset::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(pattern) = tokens.next() else {
            continue;
        };

        let owners: Vec<String> = tokens
            .map(|token| normalize_owner(token).to_string())
            .collect();

        if owners.is_empty() {
            tracing::trace!(line = index + 1, pattern, "Skipping owners line without owners");
            continue;
        }

        ruleset.push(Rule {
            pattern: pattern.to_string(),
            owners,
        });
    }

    ruleset
}

/// Parses raw file bytes, replacing invalid UTF-8 sequences.
pub fn parse_bytes(content: &[u8]) -> Ruleset {
    parse(&String::from_utf8_lossy(content))
}
