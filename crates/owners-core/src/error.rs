//! Error types for owners-core

use std::path::PathBuf;

use owners_git::RemoteError;

/// Result type for owners-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in owners-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration or rules file not found at expected path
    #[error("File not found at {path}")]
    FileNotFound { path: PathBuf },

    /// A required configuration value is unset
    #[error("Missing required configuration value: {field}")]
    MissingField { field: &'static str },

    /// The committer name or email cannot appear in a commit header
    #[error("Invalid {field}: {reason}")]
    InvalidIdentity {
        field: &'static str,
        #[source]
        reason: owners_git::IdentityError,
    },

    /// A desired rule cannot be written to an owners file
    #[error("Invalid rule '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },

    /// The owners file could not be read from the branch
    #[error("Reading {path} failed: {source}")]
    Read {
        path: String,
        #[source]
        source: RemoteError,
    },

    // Transparent wrappers for underlying crate errors
    /// Commit error from owners-git
    #[error(transparent)]
    Git(#[from] owners_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
