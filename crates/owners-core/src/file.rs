//! Owners file addressing.

use std::fmt;

use owners_git::RepositoryId;
use owners_rules::Ruleset;

/// A branch of a repository whose owners file is managed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchTarget {
    pub repository_owner: String,
    pub repository_name: String,
    pub branch: String,
}

impl BranchTarget {
    pub fn new(
        repository_owner: impl Into<String>,
        repository_name: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            repository_owner: repository_owner.into(),
            repository_name: repository_name.into(),
            branch: branch.into(),
        }
    }

    pub fn repository(&self) -> RepositoryId {
        RepositoryId::new(&self.repository_owner, &self.repository_name)
    }

    /// Pair this branch with the rules its owners file should hold.
    pub fn with_ruleset(self, ruleset: Ruleset) -> OwnersFile {
        OwnersFile {
            repository_owner: self.repository_owner,
            repository_name: self.repository_name,
            branch: self.branch,
            ruleset,
        }
    }
}

impl fmt::Display for BranchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}",
            self.repository_owner, self.repository_name, self.branch
        )
    }
}

/// The desired state of one owners file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnersFile {
    pub repository_owner: String,
    pub repository_name: String,
    pub branch: String,
    pub ruleset: Ruleset,
}

impl OwnersFile {
    pub fn target(&self) -> BranchTarget {
        BranchTarget::new(&self.repository_owner, &self.repository_name, &self.branch)
    }
}
