//! [`TestRepo`] builder for owners test scenarios.

use std::path::Path;

use git2::{Oid, Repository};
use tempfile::TempDir;

use crate::git;

/// A temporary repository with one seeded branch.
///
/// # Example
///
/// ```rust,no_run
/// use owners_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::new("main");
/// repo.commit_files(&[(".github/CODEOWNERS", "* @alice\n")], "Seed owners");
/// repo.assert_file_contains(".github/CODEOWNERS", "@alice");
/// ```
pub struct TestRepo {
    repo: Repository,
    branch: String,
    temp_dir: TempDir,
}

impl TestRepo {
    /// Create a repository whose `branch` holds a single README commit.
    pub fn new(branch: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let repo = git::real_git_repo_with_commit(temp_dir.path(), branch, &[("README.md", "# Test")]);
        Self {
            repo,
            branch: branch.to_string(),
            temp_dir,
        }
    }

    /// Return the root path of the repository.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Commit files on the seeded branch.
    pub fn commit_files(&self, files: &[(&str, &str)], message: &str) -> Oid {
        git::commit_files(&self.repo, &self.branch, files, message)
    }

    /// Current tip of the seeded branch.
    pub fn tip(&self) -> Oid {
        git::branch_tip(&self.repo, &self.branch).id()
    }

    /// File content at the tip of the seeded branch.
    pub fn read_file(&self, path: &str) -> Option<String> {
        git::read_file(&self.repo, &self.branch, path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Assert that `path` at the branch tip contains `content`.
    ///
    /// # Panics
    /// Panics if the file is missing or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self
            .read_file(path)
            .unwrap_or_else(|| panic!("Expected file to exist on {}: {path}", self.branch));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
