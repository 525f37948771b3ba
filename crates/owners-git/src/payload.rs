//! Canonical commit payload.
//!
//! A commit signature covers the commit exactly as it is stored in the object
//! database, minus the signature header itself. The text built here has to
//! match that byte for byte or the signature will not verify.

use crate::remote::CommitIdentity;

/// Why an author name or email cannot be written to a commit header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("is empty")]
    Empty,

    #[error("contains {0:?}")]
    Forbidden(char),
}

/// Trim an author name or email the way git does when storing it.
///
/// Git strips leading and trailing ASCII whitespace from both parts of a
/// signature, so the signed payload must carry the trimmed form too. Angle
/// brackets, line breaks and NUL would corrupt the header and are rejected.
pub fn normalize_identity_field(value: &str) -> Result<String, IdentityError> {
    let trimmed =
        value.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r'));
    if trimmed.is_empty() {
        return Err(IdentityError::Empty);
    }
    if let Some(c) = trimmed
        .chars()
        .find(|&c| matches!(c, '<' | '>' | '\n' | '\r' | '\0'))
    {
        return Err(IdentityError::Forbidden(c));
    }
    Ok(trimmed.to_string())
}

/// Build the signed payload for a single-parent commit.
///
/// ```text
/// tree <tree>
/// parent <parent>
/// author <name> <<email>> <unix seconds> +0000
/// committer <name> <<email>> <unix seconds> +0000
///
/// <message>
/// ```
///
/// Author and committer share one identity. The message is appended as given,
/// with no trailing newline added.
pub fn commit_payload(
    tree_sha: &str,
    parent_sha: &str,
    identity: &CommitIdentity,
    message: &str,
) -> String {
    let signature_line = format!(
        "{} <{}> {} +0000",
        identity.name,
        identity.email,
        identity.date.timestamp()
    );

    format!(
        "tree {tree_sha}\nparent {parent_sha}\nauthor {signature_line}\ncommitter {signature_line}\n\n{message}"
    )
}
