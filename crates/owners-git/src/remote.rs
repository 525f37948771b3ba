//! Repository object API consumed by the commit builder.
//!
//! Mirrors the subset of a hosting provider's git data API that a single
//! commit needs: resolve a branch, layer files onto a tree, look up the parent,
//! write a commit and move the branch.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};

/// Result type for [`RepositoryApi`] calls
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Failures reported by a [`RepositoryApi`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("{message}")]
    Rejected { message: String },

    #[error(transparent)]
    Git(#[from] git2::Error),
}

impl RemoteError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl RepositoryId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A branch reference and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Fully qualified name, e.g. `refs/heads/main`
    pub name: String,

    /// Target commit SHA
    pub sha: String,
}

impl BranchRef {
    /// Fully qualified reference name for a branch.
    pub fn qualified_name(branch: &str) -> String {
        format!("refs/heads/{branch}")
    }
}

/// A tree object created remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeObject {
    pub sha: String,
}

/// One file written or replaced by a commit.
#[derive(Clone, PartialEq, Eq)]
pub struct CommitChange {
    /// Repository-relative path, `/`-separated
    pub path: String,

    /// Full file content
    pub content: Vec<u8>,
}

impl CommitChange {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

impl fmt::Debug for CommitChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitChange")
            .field("path", &self.path)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// Name, email and timestamp of a commit author or committer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,

    /// Always whole seconds, UTC
    pub date: DateTime<Utc>,
}

impl CommitIdentity {
    /// Identity at `date`, truncated to second precision.
    pub fn new(name: impl Into<String>, email: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: date.trunc_subsecs(0),
        }
    }

    /// Identity stamped with the current time.
    pub fn now(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email, Utc::now())
    }
}

/// The commit data nested inside a [`RepositoryCommit`].
///
/// Hosting APIs often leave `sha` empty on this nested representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitObject {
    pub sha: Option<String>,
    pub tree_sha: String,
    pub message: String,
    pub author: Option<CommitIdentity>,
    pub parent_shas: Vec<String>,
}

impl CommitObject {
    /// The commit SHA, or an empty string when the API did not provide one.
    pub fn sha(&self) -> &str {
        self.sha.as_deref().unwrap_or_default()
    }
}

/// A commit as returned by a commit lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCommit {
    pub sha: String,
    pub commit: CommitObject,
}

impl RepositoryCommit {
    /// Backfill the nested commit's SHA from the outer object and return it.
    ///
    /// The nested object is what a new commit references as its parent, so it
    /// must carry the SHA even when the API omitted it.
    pub fn normalized(mut self) -> CommitObject {
        self.commit.sha = Some(self.sha);
        self.commit
    }
}

/// Everything needed to write a commit object.
#[derive(Debug, Clone)]
pub struct NewCommit {
    pub tree_sha: String,
    pub parents: Vec<CommitObject>,
    pub author: CommitIdentity,
    pub committer: CommitIdentity,
    pub message: String,

    /// ASCII-armored detached signature over the canonical payload
    pub signature: Option<String>,
}

/// Repository object operations a signed commit needs.
///
/// Calls are synchronous and blocking. Implementations must not retry on
/// their own; callers decide how to recover.
pub trait RepositoryApi {
    /// Resolve `refs/heads/<branch>`.
    fn get_branch_ref(&self, repo: &RepositoryId, branch: &str) -> RemoteResult<BranchRef>;

    /// Create a tree that layers `changes` onto the tree of `base`.
    ///
    /// `base` may name a commit or a tree.
    fn create_tree(
        &self,
        repo: &RepositoryId,
        base: &str,
        changes: &[CommitChange],
    ) -> RemoteResult<TreeObject>;

    /// Fetch a commit by SHA.
    fn get_commit(&self, repo: &RepositoryId, sha: &str) -> RemoteResult<RepositoryCommit>;

    /// Write a commit object and return its SHA. Does not move any ref.
    fn create_commit(&self, repo: &RepositoryId, commit: &NewCommit) -> RemoteResult<String>;

    /// Point `reference.name` at `reference.sha`.
    ///
    /// Without `force` the update must be a fast forward of the current target.
    fn update_ref(
        &self,
        repo: &RepositoryId,
        reference: &BranchRef,
        force: bool,
    ) -> RemoteResult<BranchRef>;

    /// Read a file at the tip of `branch`. `Ok(None)` when the path does not exist.
    fn get_file_contents(
        &self,
        repo: &RepositoryId,
        branch: &str,
        path: &str,
    ) -> RemoteResult<Option<Vec<u8>>>;
}

impl<T: RepositoryApi + ?Sized> RepositoryApi for &T {
    fn get_branch_ref(&self, repo: &RepositoryId, branch: &str) -> RemoteResult<BranchRef> {
        (**self).get_branch_ref(repo, branch)
    }

    fn create_tree(
        &self,
        repo: &RepositoryId,
        base: &str,
        changes: &[CommitChange],
    ) -> RemoteResult<TreeObject> {
        (**self).create_tree(repo, base, changes)
    }

    fn get_commit(&self, repo: &RepositoryId, sha: &str) -> RemoteResult<RepositoryCommit> {
        (**self).get_commit(repo, sha)
    }

    fn create_commit(&self, repo: &RepositoryId, commit: &NewCommit) -> RemoteResult<String> {
        (**self).create_commit(repo, commit)
    }

    fn update_ref(
        &self,
        repo: &RepositoryId,
        reference: &BranchRef,
        force: bool,
    ) -> RemoteResult<BranchRef> {
        (**self).update_ref(repo, reference, force)
    }

    fn get_file_contents(
        &self,
        repo: &RepositoryId,
        branch: &str,
        path: &str,
    ) -> RemoteResult<Option<Vec<u8>>> {
        (**self).get_file_contents(repo, branch, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalized_backfills_nested_sha() {
        let fetched = RepositoryCommit {
            sha: "abc123".to_string(),
            commit: CommitObject {
                sha: None,
                tree_sha: "tree1".to_string(),
                message: "msg".to_string(),
                author: None,
                parent_shas: vec![],
            },
        };

        let parent = fetched.normalized();
        assert_eq!(parent.sha(), "abc123");
        assert_eq!(parent.tree_sha, "tree1");
    }

    #[test]
    fn test_identity_truncates_to_seconds() {
        let date = Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap();
        let identity = CommitIdentity::new("Jane Doe", "jane@example.com", date);
        assert_eq!(identity.date.timestamp(), 1_700_000_000);
        assert_eq!(identity.date.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_repository_id_display() {
        assert_eq!(RepositoryId::new("acme", "widgets").to_string(), "acme/widgets");
    }
}
