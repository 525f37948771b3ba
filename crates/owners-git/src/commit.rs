//! Signed commit construction.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::payload::{commit_payload, normalize_identity_field};
use crate::remote::{
    BranchRef, CommitChange, CommitIdentity, NewCommit, RepositoryApi, RepositoryId,
};
use crate::signing::{CommitSigner, sign_detached};
use crate::{Error, Result};

/// One commit to create. Built fresh per operation and consumed by it.
#[derive(Clone, Default)]
pub struct SignedCommitRequest {
    pub repo_owner: String,
    pub repo_name: String,
    pub branch: String,
    pub message: String,
    pub changes: Vec<CommitChange>,
    pub author_name: String,
    pub author_email: String,

    /// ASCII-armored secret key. `None` or blank produces an unsigned commit.
    pub signing_key: Option<String>,
    pub signing_passphrase: Option<String>,
}

impl SignedCommitRequest {
    pub fn repository(&self) -> RepositoryId {
        RepositoryId::new(&self.repo_owner, &self.repo_name)
    }

    fn signing_key(&self) -> Option<&str> {
        self.signing_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

impl fmt::Debug for SignedCommitRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedCommitRequest")
            .field("repo_owner", &self.repo_owner)
            .field("repo_name", &self.repo_name)
            .field("branch", &self.branch)
            .field("message", &self.message)
            .field("changes", &self.changes)
            .field("author_name", &self.author_name)
            .field("author_email", &self.author_email)
            .field("signing_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .field(
                "signing_passphrase",
                &self.signing_passphrase.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// SHA of the new commit, now the branch tip
    pub sha: String,
    pub tree_sha: String,
    pub parent_sha: String,
    pub signed: bool,
}

/// Runs the commit protocol against a [`RepositoryApi`].
///
/// The clock and signer can be replaced, which is how tests pin timestamps
/// and avoid real key material.
pub struct CommitBuilder<'a, A: ?Sized> {
    api: &'a A,
    clock: fn() -> DateTime<Utc>,
    signer: Option<&'a dyn CommitSigner>,
}

impl<'a, A: RepositoryApi + ?Sized> CommitBuilder<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            clock: Utc::now,
            signer: None,
        }
    }

    /// Use `clock` for the author/committer timestamp.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Sign every commit with `signer` instead of the request's key material.
    pub fn with_signer(mut self, signer: &'a dyn CommitSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Create the commit and advance the branch to it.
    ///
    /// The author name and email are trimmed and checked first
    /// ([`Error::InvalidIdentity`]), before the repository is touched. Steps
    /// then run in order and the first failure is returned as is:
    ///
    /// 1. resolve the branch tip ([`Error::RefNotFound`])
    /// 2. create a tree with the changes on top of the tip ([`Error::TreeCreationFailed`])
    /// 3. fetch the tip commit as parent ([`Error::ParentLookupFailed`])
    /// 4. sign the canonical payload, when a signer or key is present
    /// 5. create the commit ([`Error::CommitCreationFailed`])
    /// 6. fast-forward the branch, never forced ([`Error::RefUpdateFailed`])
    pub fn commit(&self, request: SignedCommitRequest) -> Result<CommitOutcome> {
        let author_name = identity_field("name", &request.author_name)?;
        let author_email = identity_field("email", &request.author_email)?;
        let repo = request.repository();

        let tip = self
            .api
            .get_branch_ref(&repo, &request.branch)
            .map_err(|source| Error::RefNotFound {
                branch: request.branch.clone(),
                source,
            })?;
        debug!(repo = %repo, branch = %request.branch, tip = %tip.sha, "Resolved branch tip");

        let tree = self
            .api
            .create_tree(&repo, &tip.sha, &request.changes)
            .map_err(|source| Error::TreeCreationFailed { source })?;
        debug!(tree = %tree.sha, changes = request.changes.len(), "Created tree");

        let parent = self
            .api
            .get_commit(&repo, &tip.sha)
            .map_err(|source| Error::ParentLookupFailed {
                sha: tip.sha.clone(),
                source,
            })?
            .normalized();
        let parent_sha = parent.sha().to_string();
        debug!(parent = %parent_sha, "Fetched parent commit");

        let identity = CommitIdentity::new(author_name, author_email, (self.clock)());
        let signature = self.sign(&request, &tree.sha, &parent_sha, &identity)?;
        let signed = signature.is_some();

        let new_commit = NewCommit {
            tree_sha: tree.sha.clone(),
            parents: vec![parent],
            author: identity.clone(),
            committer: identity,
            message: request.message,
            signature,
        };

        let sha = self
            .api
            .create_commit(&repo, &new_commit)
            .map_err(|source| Error::CommitCreationFailed { source })?;
        debug!(commit = %sha, signed, "Created commit");

        let target = BranchRef {
            name: tip.name,
            sha: sha.clone(),
        };
        if let Err(source) = self.api.update_ref(&repo, &target, false) {
            warn!(
                branch = %request.branch,
                commit = %sha,
                error = %source,
                "Branch update rejected"
            );
            return Err(Error::RefUpdateFailed {
                branch: request.branch,
                source,
            });
        }

        info!(repo = %repo, branch = %request.branch, commit = %sha, signed, "Committed changes");

        Ok(CommitOutcome {
            sha,
            tree_sha: tree.sha,
            parent_sha,
            signed,
        })
    }

    fn sign(
        &self,
        request: &SignedCommitRequest,
        tree_sha: &str,
        parent_sha: &str,
        identity: &CommitIdentity,
    ) -> Result<Option<String>> {
        let payload = || commit_payload(tree_sha, parent_sha, identity, &request.message);

        if let Some(signer) = self.signer {
            return signer.sign(&payload()).map(Some);
        }

        match request.signing_key() {
            Some(key) => {
                let passphrase = request.signing_passphrase.as_deref().unwrap_or_default();
                sign_detached(&payload(), key, passphrase).map(Some)
            }
            None => Ok(None),
        }
    }
}

fn identity_field(field: &'static str, value: &str) -> Result<String> {
    normalize_identity_field(value).map_err(|reason| Error::InvalidIdentity {
        field,
        value: value.to_string(),
        reason,
    })
}

/// Create one commit on `request.branch` with the system clock.
///
/// The commit is signed when the request carries a signing key.
pub fn create_signed_commit<A: RepositoryApi + ?Sized>(
    api: &A,
    request: SignedCommitRequest,
) -> Result<CommitOutcome> {
    CommitBuilder::new(api).commit(request)
}
