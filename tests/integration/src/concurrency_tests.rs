//! Branches that move while an owners file is being committed.

use std::sync::atomic::{AtomicBool, Ordering};

use owners_core::{ApplyOutcome, BranchTarget, OwnersService, ProviderConfig};
use owners_git::{
    BranchRef, CommitChange, Error, LocalRepository, NewCommit, RemoteResult, RepositoryApi,
    RepositoryCommit, RepositoryId, TreeObject,
};
use owners_rules::{Rule, Ruleset};
use owners_test_utils::git;
use owners_test_utils::repo::TestRepo;
use pretty_assertions::assert_eq;

/// Lets another writer commit to `main` once, right after the parent lookup.
struct InterleavedWriter {
    inner: LocalRepository,
    armed: AtomicBool,
}

impl InterleavedWriter {
    fn new(inner: LocalRepository) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(true),
        }
    }
}

impl RepositoryApi for InterleavedWriter {
    fn get_branch_ref(&self, repo: &RepositoryId, branch: &str) -> RemoteResult<BranchRef> {
        self.inner.get_branch_ref(repo, branch)
    }

    fn create_tree(
        &self,
        repo: &RepositoryId,
        base: &str,
        changes: &[CommitChange],
    ) -> RemoteResult<TreeObject> {
        self.inner.create_tree(repo, base, changes)
    }

    fn get_commit(&self, repo: &RepositoryId, sha: &str) -> RemoteResult<RepositoryCommit> {
        let commit = self.inner.get_commit(repo, sha)?;
        if self.armed.swap(false, Ordering::SeqCst) {
            git::commit_files(
                self.inner.repository(),
                "main",
                &[("src/lib.rs", "// new module")],
                "Concurrent change",
            );
        }
        Ok(commit)
    }

    fn create_commit(&self, repo: &RepositoryId, commit: &NewCommit) -> RemoteResult<String> {
        self.inner.create_commit(repo, commit)
    }

    fn update_ref(
        &self,
        repo: &RepositoryId,
        reference: &BranchRef,
        force: bool,
    ) -> RemoteResult<BranchRef> {
        self.inner.update_ref(repo, reference, force)
    }

    fn get_file_contents(
        &self,
        repo: &RepositoryId,
        branch: &str,
        path: &str,
    ) -> RemoteResult<Option<Vec<u8>>> {
        self.inner.get_file_contents(repo, branch, path)
    }
}

fn config() -> ProviderConfig {
    ProviderConfig {
        username: "owners-bot".to_string(),
        email: "owners-bot@example.com".to_string(),
        ..Default::default()
    }
}

fn file() -> owners_core::OwnersFile {
    BranchTarget::new("acme", "widgets", "main")
        .with_ruleset(Ruleset::from(vec![Rule::new("*", ["alice"])]))
}

#[test]
fn test_moved_branch_fails_without_overwrite() {
    let repo = TestRepo::new("main");
    let writer = InterleavedWriter::new(LocalRepository::open(repo.root()).unwrap());
    let service = OwnersService::new(writer, config()).unwrap();

    let err = service.apply(&file()).unwrap_err();

    assert!(
        matches!(err, owners_core::Error::Git(Error::RefUpdateFailed { .. })),
        "got: {err:?}"
    );
    let tip = repo.repository().find_commit(repo.tip()).unwrap();
    assert_eq!(tip.message(), Some("Concurrent change"));
    assert_eq!(repo.read_file(".github/CODEOWNERS"), None);
}

#[test]
fn test_retry_after_move_succeeds_on_new_tip() {
    let repo = TestRepo::new("main");
    let writer = InterleavedWriter::new(LocalRepository::open(repo.root()).unwrap());
    let service = OwnersService::new(writer, config()).unwrap();

    assert!(service.apply(&file()).is_err());
    let concurrent = repo.tip();

    let ApplyOutcome::Committed(outcome) = service.apply(&file()).unwrap() else {
        panic!("expected a commit");
    };

    assert_eq!(outcome.parent_sha, concurrent.to_string());
    repo.assert_file_contains("src/lib.rs", "// new module");
    repo.assert_file_contains(".github/CODEOWNERS", "* @alice");
}
