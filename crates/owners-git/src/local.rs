//! [`RepositoryApi`] over a repository on disk.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::build::TreeUpdateBuilder;
use git2::{ErrorCode, FileMode, Oid, Repository, Signature, Time};

use crate::remote::{
    BranchRef, CommitChange, CommitIdentity, CommitObject, NewCommit, RemoteError, RemoteResult,
    RepositoryApi, RepositoryCommit, RepositoryId, TreeObject,
};
use crate::Result;

/// A local git repository exposed through the object API.
///
/// Serves a single repository: the [`RepositoryId`] passed to each call is
/// only used for logging. Objects are written straight into the object
/// database; only [`update_ref`](RepositoryApi::update_ref) moves a branch.
pub struct LocalRepository {
    repo: Repository,
}

impl LocalRepository {
    /// Open the repository at `path` (bare or with a working tree).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::open(path.as_ref())?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    fn parse_oid(sha: &str) -> RemoteResult<Oid> {
        Oid::from_str(sha).map_err(|_| RemoteError::rejected(format!("Invalid object id '{sha}'")))
    }
}

fn not_found(what: impl Into<String>) -> impl FnOnce(git2::Error) -> RemoteError {
    let what = what.into();
    move |err| {
        if err.code() == ErrorCode::NotFound {
            RemoteError::not_found(what)
        } else {
            RemoteError::Git(err)
        }
    }
}

fn to_signature(identity: &CommitIdentity) -> RemoteResult<Signature<'static>> {
    let time = Time::new(identity.date.timestamp(), 0);
    Ok(Signature::new(&identity.name, &identity.email, &time)?)
}

fn from_signature(signature: &Signature<'_>) -> CommitIdentity {
    let date: DateTime<Utc> = Utc
        .timestamp_opt(signature.when().seconds(), 0)
        .single()
        .unwrap_or_default();

    CommitIdentity {
        name: signature.name().unwrap_or("Unknown").to_string(),
        email: signature.email().unwrap_or_default().to_string(),
        date,
    }
}

impl RepositoryApi for LocalRepository {
    fn get_branch_ref(&self, repo: &RepositoryId, branch: &str) -> RemoteResult<BranchRef> {
        let name = BranchRef::qualified_name(branch);
        let reference = self
            .repo
            .find_reference(&name)
            .map_err(not_found(format!("Reference {name} in {repo}")))?;
        let commit = reference.peel_to_commit()?;

        Ok(BranchRef {
            name,
            sha: commit.id().to_string(),
        })
    }

    fn create_tree(
        &self,
        repo: &RepositoryId,
        base: &str,
        changes: &[CommitChange],
    ) -> RemoteResult<TreeObject> {
        let base_oid = Self::parse_oid(base)?;
        let base_tree = self
            .repo
            .find_object(base_oid, None)
            .map_err(not_found(format!("Object {base} in {repo}")))?
            .peel_to_tree()?;

        let mut builder = TreeUpdateBuilder::new();
        for change in changes {
            let blob = self.repo.blob(&change.content)?;
            builder.upsert(change.path.as_str(), blob, FileMode::Blob);
        }

        let tree_oid = builder.create_updated(&self.repo, &base_tree)?;
        tracing::trace!(repo = %repo, tree = %tree_oid, "Wrote tree");

        Ok(TreeObject {
            sha: tree_oid.to_string(),
        })
    }

    fn get_commit(&self, repo: &RepositoryId, sha: &str) -> RemoteResult<RepositoryCommit> {
        let oid = Self::parse_oid(sha)?;
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(not_found(format!("Commit {sha} in {repo}")))?;

        Ok(RepositoryCommit {
            sha: commit.id().to_string(),
            commit: CommitObject {
                sha: None,
                tree_sha: commit.tree_id().to_string(),
                message: commit.message().unwrap_or_default().to_string(),
                author: Some(from_signature(&commit.author())),
                parent_shas: commit.parent_ids().map(|id| id.to_string()).collect(),
            },
        })
    }

    fn create_commit(&self, repo: &RepositoryId, commit: &NewCommit) -> RemoteResult<String> {
        let tree = self
            .repo
            .find_tree(Self::parse_oid(&commit.tree_sha)?)
            .map_err(not_found(format!("Tree {} in {repo}", commit.tree_sha)))?;

        let mut parents = Vec::with_capacity(commit.parents.len());
        for parent in &commit.parents {
            if parent.sha().is_empty() {
                return Err(RemoteError::rejected("Parent commit is missing its sha"));
            }
            let oid = Self::parse_oid(parent.sha())?;
            parents.push(
                self.repo
                    .find_commit(oid)
                    .map_err(not_found(format!("Parent commit {oid} in {repo}")))?,
            );
        }
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        let author = to_signature(&commit.author)?;
        let committer = to_signature(&commit.committer)?;

        let oid = match &commit.signature {
            Some(signature) => {
                let buffer = self.repo.commit_create_buffer(
                    &author,
                    &committer,
                    &commit.message,
                    &tree,
                    &parent_refs,
                )?;
                let content = std::str::from_utf8(&buffer).map_err(|err| {
                    RemoteError::rejected(format!("Commit content is not valid UTF-8: {err}"))
                })?;
                self.repo.commit_signed(content, signature, None)?
            }
            None => self.repo.commit(
                None,
                &author,
                &committer,
                &commit.message,
                &tree,
                &parent_refs,
            )?,
        };

        Ok(oid.to_string())
    }

    fn update_ref(
        &self,
        repo: &RepositoryId,
        reference: &BranchRef,
        force: bool,
    ) -> RemoteResult<BranchRef> {
        let new_oid = Self::parse_oid(&reference.sha)?;
        let current = self
            .repo
            .find_reference(&reference.name)
            .map_err(not_found(format!("Reference {} in {repo}", reference.name)))?;
        let current_oid = current.target().ok_or_else(|| {
            RemoteError::rejected(format!("{} is a symbolic reference", reference.name))
        })?;

        if !force && current_oid != new_oid && !self.repo.graph_descendant_of(new_oid, current_oid)? {
            return Err(RemoteError::rejected(format!(
                "Update is not a fast forward: {new_oid} does not descend from {current_oid}"
            )));
        }

        // Compare-and-swap on the target read above.
        let log_message = format!("owners: move {} to {new_oid}", reference.name);
        self.repo
            .reference_matching(&reference.name, new_oid, true, current_oid, &log_message)?;

        Ok(reference.clone())
    }

    fn get_file_contents(
        &self,
        repo: &RepositoryId,
        branch: &str,
        path: &str,
    ) -> RemoteResult<Option<Vec<u8>>> {
        let tip = self.get_branch_ref(repo, branch)?;
        let tree = self.repo.find_commit(Self::parse_oid(&tip.sha)?)?.tree()?;

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(err) if err.code() == ErrorCode::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
        Ok(Some(blob.content().to_vec()))
    }
}
