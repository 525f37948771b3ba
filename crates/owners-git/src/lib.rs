//! Signed commit construction for owners files.
//!
//! Turns a set of file changes into one new commit on a branch, optionally
//! carrying a detached OpenPGP signature over the commit's canonical payload,
//! and advances the branch to it.
//!
//! The repository itself is reached through [`RepositoryApi`], a small object
//! API (refs, trees, commits). Two implementations ship with the crate:
//!
//! - [`LocalRepository`] works against a repository on disk through `git2`.
//! - [`testing::MemoryRepository`] keeps everything in memory and can inject
//!   failures, for exercising callers.
//!
//! The protocol is linear:
//!
//! ```text
//! ResolveRef -> CreateTree -> FetchParent -> [Sign] -> CreateCommit -> UpdateRef
//! ```
//!
//! Any failing step aborts the rest. Trees and commits created before the
//! failure are left unreferenced. The branch update is never forced, so a
//! branch that moved underneath the operation makes it fail instead of being
//! overwritten.

pub mod commit;
pub mod error;
pub mod local;
pub mod payload;
pub mod remote;
pub mod signing;
pub mod testing;

pub use commit::{CommitBuilder, CommitOutcome, SignedCommitRequest, create_signed_commit};
pub use error::{Error, Result};
pub use local::LocalRepository;
pub use payload::{IdentityError, commit_payload, normalize_identity_field};
pub use remote::{
    BranchRef, CommitChange, CommitIdentity, CommitObject, NewCommit, RemoteError, RemoteResult,
    RepositoryApi, RepositoryCommit, RepositoryId, TreeObject,
};
pub use signing::{CommitSigner, PgpSigner, sign_detached};
