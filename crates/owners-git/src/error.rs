//! Error types for owners-git

use crate::payload::IdentityError;
use crate::remote::RemoteError;

/// Result type for owners-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a signed commit.
///
/// Remote failures keep the underlying [`RemoteError`] as their source and
/// print it verbatim. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Author {field} {value:?} {reason}")]
    InvalidIdentity {
        field: &'static str,
        value: String,
        #[source]
        reason: IdentityError,
    },

    #[error("Branch '{branch}' could not be resolved: {source}")]
    RefNotFound {
        branch: String,
        #[source]
        source: RemoteError,
    },

    #[error("Tree creation failed: {source}")]
    TreeCreationFailed {
        #[source]
        source: RemoteError,
    },

    #[error("Parent commit {sha} lookup failed: {source}")]
    ParentLookupFailed {
        sha: String,
        #[source]
        source: RemoteError,
    },

    #[error("Commit creation failed: {source}")]
    CommitCreationFailed {
        #[source]
        source: RemoteError,
    },

    #[error("Updating branch '{branch}' failed: {source}")]
    RefUpdateFailed {
        branch: String,
        #[source]
        source: RemoteError,
    },

    #[error("Signing key could not be parsed: {source}")]
    KeyParse {
        #[source]
        source: pgp::errors::Error,
    },

    #[error("Signing key block has no key that may sign")]
    NoSigningKey,

    #[error("Signing key could not be decrypted: {source}")]
    Decrypt {
        #[source]
        source: pgp::errors::Error,
    },

    #[error("Signing failed: {source}")]
    Signing {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}

impl Error {
    pub fn signing(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Signing {
            source: source.into(),
        }
    }

    /// Whether the failure happened while producing the signature.
    pub fn is_signing_failure(&self) -> bool {
        matches!(
            self,
            Self::KeyParse { .. }
                | Self::NoSigningKey
                | Self::Decrypt { .. }
                | Self::Signing { .. }
        )
    }
}
