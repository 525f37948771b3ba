//! Error types for owners-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from owners-core
    #[error(transparent)]
    Core(#[from] owners_core::Error),

    /// Error from owners-git
    #[error(transparent)]
    Git(#[from] owners_git::Error),

    /// Repository discovery error
    #[error("Not a git repository: {0}")]
    Repository(#[from] git2::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
