//! Owners file generation.

use crate::ruleset::Ruleset;

/// First line of every generated owners file.
pub const GENERATED_HEADER: &str =
    "# automatically generated by owners - please do not edit here";

/// Compiles a ruleset into owners file content.
///
/// An absent ruleset (`None`) compiles to zero bytes, without the header.
/// A present but empty ruleset compiles to the header line alone. Callers
/// rely on the difference: the empty output is what gets committed when the
/// file is cleared.
///
/// Each rule becomes `pattern @user email@host ...`. Every owner token is
/// followed by a single space, so lines end in whitespace before the newline.
///
/// # Example
/// ```
/// use owners_rules::{GENERATED_HEADER, Rule, Ruleset, compile};
///
/// let ruleset: Ruleset = vec![Rule::new("*.rs", ["alice", "bob@example.com"])].into();
/// let content = String::from_utf8(compile(Some(&ruleset))).unwrap();
/// assert_eq!(content, format!("{GENERATED_HEADER}\n*.rs @alice bob@example.com \n"));
///
/// assert!(compile(None).is_empty());
/// ```
pub fn compile(ruleset: Option<&Ruleset>) -> Vec<u8> {
    let Some(ruleset) = ruleset else {
        return Vec::new();
    };

    let mut output = String::with_capacity(GENERATED_HEADER.len() + 1 + ruleset.len() * 32);
    output.push_str(GENERATED_HEADER);
    output.push('\n');

    for rule in ruleset {
        output.push_str(&rule.pattern);
        output.push(' ');
        for token in rule.owner_tokens() {
            output.push_str(&token);
            output.push(' ');
        }
        output.push('\n');
    }

    output.into_bytes()
}
