//! Git repository fixtures.
//!
//! Everything goes through `git2`, so no `git` binary or user configuration is
//! needed and commits never pick up a global signing setup.

use std::path::Path;

use git2::build::TreeUpdateBuilder;
use git2::{FileMode, Oid, Repository, Signature, Time};

/// Identity used for fixture commits.
pub const FIXTURE_NAME: &str = "Fixture Author";
pub const FIXTURE_EMAIL: &str = "fixture@example.com";

/// Initialises an empty repository at `path` (no commits).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a repository whose `branch` holds one commit with `files`.
///
/// HEAD is pointed at `branch`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path, branch: &str, files: &[(&str, &str)]) -> Repository {
    let repo = real_git_repo(path);
    commit_files(&repo, branch, files, "Initial commit");
    repo.set_head(&format!("refs/heads/{branch}"))
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: failed to set HEAD: {e}"));
    repo
}

/// Commits `files` on top of `branch` and moves the branch, creating it when
/// it does not exist yet. Returns the new commit id.
///
/// Plays the part of another writer in concurrency tests.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_files(repo: &Repository, branch: &str, files: &[(&str, &str)], message: &str) -> Oid {
    let refname = format!("refs/heads/{branch}");
    let parent = repo
        .find_reference(&refname)
        .ok()
        .and_then(|r| r.peel_to_commit().ok());

    let base_tree = match &parent {
        Some(commit) => commit.tree().unwrap(),
        None => {
            let empty = repo.treebuilder(None).unwrap().write().unwrap();
            repo.find_tree(empty).unwrap()
        }
    };

    let mut builder = TreeUpdateBuilder::new();
    for (file, content) in files {
        let blob = repo.blob(content.as_bytes()).unwrap();
        builder.upsert(*file, blob, FileMode::Blob);
    }
    let tree_id = builder.create_updated(repo, &base_tree).unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let signature = fixture_signature();
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(
        Some(&refname),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )
    .unwrap_or_else(|e| panic!("commit_files: failed to commit on {branch}: {e}"))
}

/// Reads `file` at the tip of `branch`, or `None` when it does not exist.
///
/// # Panics
/// Panics if the branch cannot be resolved.
pub fn read_file(repo: &Repository, branch: &str, file: &str) -> Option<Vec<u8>> {
    let commit = branch_tip(repo, branch);
    let tree = commit.tree().unwrap();
    let entry = tree.get_path(Path::new(file)).ok()?;
    let blob = entry.to_object(repo).unwrap().peel_to_blob().unwrap();
    Some(blob.content().to_vec())
}

/// Returns the commit `branch` points at.
///
/// # Panics
/// Panics if the branch does not exist.
pub fn branch_tip<'r>(repo: &'r Repository, branch: &str) -> git2::Commit<'r> {
    repo.find_reference(&format!("refs/heads/{branch}"))
        .and_then(|r| r.peel_to_commit())
        .unwrap_or_else(|e| panic!("branch_tip: branch {branch} not found: {e}"))
}

fn fixture_signature() -> Signature<'static> {
    Signature::new(FIXTURE_NAME, FIXTURE_EMAIL, &Time::new(1_600_000_000, 0)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_files_builds_history() {
        let temp = TempDir::new().unwrap();
        let repo = real_git_repo_with_commit(temp.path(), "main", &[("README.md", "# Test")]);

        let first = branch_tip(&repo, "main").id();
        let second = commit_files(&repo, "main", &[("docs/guide.md", "guide")], "Add guide");

        assert_eq!(branch_tip(&repo, "main").id(), second);
        assert_eq!(branch_tip(&repo, "main").parent_id(0).unwrap(), first);
        assert_eq!(read_file(&repo, "main", "README.md").unwrap(), b"# Test");
        assert_eq!(read_file(&repo, "main", "docs/guide.md").unwrap(), b"guide");
        assert!(read_file(&repo, "main", "missing").is_none());
    }
}
