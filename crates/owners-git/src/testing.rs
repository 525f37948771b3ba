//! In-memory repository and signer doubles.
//!
//! [`MemoryRepository`] behaves like a hosting provider's git data API: nested
//! commit objects come back without a SHA, non-forced ref updates must be fast
//! forwards, and every call is recorded. Failures and concurrent branch moves
//! can be scheduled per operation.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::remote::{
    BranchRef, CommitChange, CommitIdentity, CommitObject, NewCommit, RemoteError, RemoteResult,
    RepositoryApi, RepositoryCommit, RepositoryId, TreeObject,
};
use crate::signing::CommitSigner;
use crate::{Error, Result};

/// A [`RepositoryApi`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetBranchRef,
    CreateTree,
    GetCommit,
    CreateCommit,
    UpdateRef,
    GetFileContents,
}

/// A commit stored by [`MemoryRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCommit {
    pub tree_sha: String,
    pub parent_shas: Vec<String>,
    pub author: CommitIdentity,
    pub committer: CommitIdentity,
    pub message: String,
    pub signature: Option<String>,
}

type Tree = BTreeMap<String, Vec<u8>>;

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    trees: HashMap<String, Tree>,
    commits: HashMap<String, StoredCommit>,
    refs: HashMap<String, String>,
    calls: Vec<Operation>,
    failures: HashMap<Operation, String>,
    races: HashMap<Operation, String>,
}

impl State {
    fn next_sha(&mut self) -> String {
        self.next_id += 1;
        format!("{:040x}", self.next_id)
    }

    fn enter(&mut self, operation: Operation) -> RemoteResult<()> {
        self.calls.push(operation);

        if let Some(branch) = self.races.remove(&operation) {
            self.advance(&branch, &[], "concurrent update");
        }

        match self.failures.get(&operation) {
            Some(message) => Err(RemoteError::rejected(message.clone())),
            None => Ok(()),
        }
    }

    fn tree_of(&self, sha: &str) -> Option<Tree> {
        self.commits
            .get(sha)
            .and_then(|commit| self.trees.get(&commit.tree_sha))
            .or_else(|| self.trees.get(sha))
            .cloned()
    }

    fn store_tree(&mut self, tree: Tree) -> String {
        let sha = self.next_sha();
        self.trees.insert(sha.clone(), tree);
        sha
    }

    /// Commit `files` on top of `branch` (creating it if needed) and move the branch.
    fn advance(&mut self, branch: &str, files: &[(&str, &[u8])], message: &str) -> String {
        let name = BranchRef::qualified_name(branch);
        let parent = self.refs.get(&name).cloned();

        let mut tree = parent
            .as_deref()
            .and_then(|sha| self.tree_of(sha))
            .unwrap_or_default();
        for (path, content) in files {
            tree.insert((*path).to_string(), content.to_vec());
        }
        let tree_sha = self.store_tree(tree);

        let identity = CommitIdentity::now("Seed", "seed@example.com");
        let sha = self.next_sha();
        self.commits.insert(
            sha.clone(),
            StoredCommit {
                tree_sha,
                parent_shas: parent.into_iter().collect(),
                author: identity.clone(),
                committer: identity,
                message: message.to_string(),
                signature: None,
            },
        );
        self.refs.insert(name, sha.clone());
        sha
    }

    fn descends_from(&self, sha: &str, ancestor: &str) -> bool {
        let mut pending = vec![sha.to_string()];
        while let Some(current) = pending.pop() {
            if current == ancestor {
                return true;
            }
            if let Some(commit) = self.commits.get(&current) {
                pending.extend(commit.parent_shas.iter().cloned());
            }
        }
        false
    }
}

/// In-memory [`RepositoryApi`].
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository with one commit on `branch` containing `files`.
    pub fn with_branch(branch: &str, files: &[(&str, &[u8])]) -> Self {
        let repository = Self::new();
        repository.commit_files(branch, files, "Initial commit");
        repository
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Commit `files` on `branch` directly, as another writer would.
    pub fn commit_files(&self, branch: &str, files: &[(&str, &[u8])], message: &str) -> String {
        self.state().advance(branch, files, message)
    }

    /// Make every later call to `operation` fail with `message`.
    pub fn fail_on(&self, operation: Operation, message: impl Into<String>) {
        self.state().failures.insert(operation, message.into());
    }

    /// Move `branch` by one commit the next time `operation` is called,
    /// simulating a concurrent writer.
    pub fn race_on(&self, operation: Operation, branch: &str) {
        self.state().races.insert(operation, branch.to_string());
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.state().calls.clone()
    }

    pub fn branch_sha(&self, branch: &str) -> Option<String> {
        self.state()
            .refs
            .get(&BranchRef::qualified_name(branch))
            .cloned()
    }

    pub fn commit(&self, sha: &str) -> Option<StoredCommit> {
        self.state().commits.get(sha).cloned()
    }

    /// File content at the tip of `branch`.
    pub fn file(&self, branch: &str, path: &str) -> Option<Vec<u8>> {
        let state = self.state();
        let sha = state.refs.get(&BranchRef::qualified_name(branch))?;
        state.tree_of(sha)?.get(path).cloned()
    }
}

impl RepositoryApi for MemoryRepository {
    fn get_branch_ref(&self, repo: &RepositoryId, branch: &str) -> RemoteResult<BranchRef> {
        let mut state = self.state();
        state.enter(Operation::GetBranchRef)?;

        let name = BranchRef::qualified_name(branch);
        let sha = state
            .refs
            .get(&name)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("Reference {name} in {repo}")))?;
        Ok(BranchRef { name, sha })
    }

    fn create_tree(
        &self,
        repo: &RepositoryId,
        base: &str,
        changes: &[CommitChange],
    ) -> RemoteResult<TreeObject> {
        let mut state = self.state();
        state.enter(Operation::CreateTree)?;

        let mut tree = state
            .tree_of(base)
            .ok_or_else(|| RemoteError::not_found(format!("Object {base} in {repo}")))?;
        for change in changes {
            tree.insert(change.path.clone(), change.content.clone());
        }

        Ok(TreeObject {
            sha: state.store_tree(tree),
        })
    }

    fn get_commit(&self, repo: &RepositoryId, sha: &str) -> RemoteResult<RepositoryCommit> {
        let mut state = self.state();
        state.enter(Operation::GetCommit)?;

        let stored = state
            .commits
            .get(sha)
            .ok_or_else(|| RemoteError::not_found(format!("Commit {sha} in {repo}")))?;

        Ok(RepositoryCommit {
            sha: sha.to_string(),
            commit: CommitObject {
                sha: None,
                tree_sha: stored.tree_sha.clone(),
                message: stored.message.clone(),
                author: Some(stored.author.clone()),
                parent_shas: stored.parent_shas.clone(),
            },
        })
    }

    fn create_commit(&self, repo: &RepositoryId, commit: &NewCommit) -> RemoteResult<String> {
        let mut state = self.state();
        state.enter(Operation::CreateCommit)?;

        if !state.trees.contains_key(&commit.tree_sha) {
            return Err(RemoteError::not_found(format!(
                "Tree {} in {repo}",
                commit.tree_sha
            )));
        }

        let mut parent_shas = Vec::with_capacity(commit.parents.len());
        for parent in &commit.parents {
            if parent.sha().is_empty() {
                return Err(RemoteError::rejected("Parent commit is missing its sha"));
            }
            if !state.commits.contains_key(parent.sha()) {
                return Err(RemoteError::not_found(format!(
                    "Parent commit {} in {repo}",
                    parent.sha()
                )));
            }
            parent_shas.push(parent.sha().to_string());
        }

        let sha = state.next_sha();
        state.commits.insert(
            sha.clone(),
            StoredCommit {
                tree_sha: commit.tree_sha.clone(),
                parent_shas,
                author: commit.author.clone(),
                committer: commit.committer.clone(),
                message: commit.message.clone(),
                signature: commit.signature.clone(),
            },
        );
        Ok(sha)
    }

    fn update_ref(
        &self,
        repo: &RepositoryId,
        reference: &BranchRef,
        force: bool,
    ) -> RemoteResult<BranchRef> {
        let mut state = self.state();
        state.enter(Operation::UpdateRef)?;

        let current = state
            .refs
            .get(&reference.name)
            .cloned()
            .ok_or_else(|| {
                RemoteError::not_found(format!("Reference {} in {repo}", reference.name))
            })?;

        if !state.commits.contains_key(&reference.sha) {
            return Err(RemoteError::not_found(format!(
                "Commit {} in {repo}",
                reference.sha
            )));
        }

        if !force && !state.descends_from(&reference.sha, &current) {
            return Err(RemoteError::rejected("Update is not a fast forward"));
        }

        state
            .refs
            .insert(reference.name.clone(), reference.sha.clone());
        Ok(reference.clone())
    }

    fn get_file_contents(
        &self,
        repo: &RepositoryId,
        branch: &str,
        path: &str,
    ) -> RemoteResult<Option<Vec<u8>>> {
        let mut state = self.state();
        state.enter(Operation::GetFileContents)?;

        let name = BranchRef::qualified_name(branch);
        let sha = state
            .refs
            .get(&name)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("Reference {name} in {repo}")))?;
        Ok(state.tree_of(&sha).and_then(|tree| tree.get(path).cloned()))
    }
}

/// A [`CommitSigner`] that returns a fixed signature and records payloads.
#[derive(Debug, Default)]
pub struct StaticSigner {
    signature: String,
    failure: Option<String>,
    payloads: Mutex<Vec<String>>,
}

impl StaticSigner {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            ..Self::default()
        }
    }

    /// A signer whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Payloads passed to [`CommitSigner::sign`], in order.
    pub fn payloads(&self) -> Vec<String> {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CommitSigner for StaticSigner {
    fn sign(&self, payload: &str) -> Result<String> {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.to_string());

        match &self.failure {
            Some(message) => Err(Error::signing(message.clone())),
            None => Ok(self.signature.clone()),
        }
    }
}

