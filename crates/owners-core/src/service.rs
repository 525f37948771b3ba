//! Reconciles owners files with their desired rules.

use chrono::{DateTime, Utc};
use owners_git::{
    CommitBuilder, CommitChange, CommitOutcome, RepositoryApi, SignedCommitRequest,
};
use owners_rules::{Ruleset, compile, parse_bytes};
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::file::{BranchTarget, OwnersFile};
use crate::{Error, Result};

/// Comparison between the owners file on a branch and the desired rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyPlan {
    /// Rules currently on the branch, `None` when the file does not exist
    pub current: Option<Ruleset>,
    pub desired: Ruleset,
}

impl ApplyPlan {
    /// Whether the branch already holds an equivalent ruleset.
    pub fn is_up_to_date(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.equal(&self.desired))
    }

    /// File content a commit would write.
    pub fn content(&self) -> Vec<u8> {
        compile(Some(&self.desired))
    }
}

/// What [`OwnersService::apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The file already matched; nothing was written.
    Unchanged,
    Committed(CommitOutcome),
}

/// Reads and writes the owners file of repositories reached through `A`.
pub struct OwnersService<A> {
    api: A,
    config: ProviderConfig,
    clock: fn() -> DateTime<Utc>,
}

impl<A: RepositoryApi> OwnersService<A> {
    /// Create a service. Fails when the committer identity is incomplete.
    pub fn new(api: A, config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            api,
            config,
            clock: Utc::now,
        })
    }

    /// Use `clock` for commit timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Parse the owners file on `target`'s branch.
    ///
    /// Returns `None` when the file does not exist. An empty file is an
    /// empty ruleset.
    pub fn read(&self, target: &BranchTarget) -> Result<Option<Ruleset>> {
        let path = &self.config.owners_path;
        let content = self
            .api
            .get_file_contents(&target.repository(), &target.branch, path)
            .map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;

        match content {
            Some(bytes) => {
                let ruleset = parse_bytes(&bytes);
                debug!(target = %target, rules = ruleset.len(), "Read owners file");
                Ok(Some(ruleset))
            }
            None => {
                debug!(target = %target, path = %path, "Owners file does not exist");
                Ok(None)
            }
        }
    }

    /// Compare the file on `target` with `desired`.
    pub fn plan(&self, target: &BranchTarget, desired: &Ruleset) -> Result<ApplyPlan> {
        Ok(ApplyPlan {
            current: self.read(target)?,
            desired: desired.clone(),
        })
    }

    /// Bring the owners file in line with `file.ruleset`.
    ///
    /// Commits only when the branch holds a different ruleset or no file.
    pub fn apply(&self, file: &OwnersFile) -> Result<ApplyOutcome> {
        let target = file.target();
        let plan = self.plan(&target, &file.ruleset)?;

        if plan.is_up_to_date() {
            info!(target = %target, "Owners file is up to date");
            return Ok(ApplyOutcome::Unchanged);
        }

        let message = self.message("Update");
        let outcome = self.commit(&target, plan.content(), message)?;
        Ok(ApplyOutcome::Committed(outcome))
    }

    /// Empty the owners file on `target`.
    ///
    /// Returns `None` without committing when there is no file.
    pub fn clear(&self, target: &BranchTarget) -> Result<Option<CommitOutcome>> {
        if self.read(target)?.is_none() {
            info!(target = %target, "No owners file to clear");
            return Ok(None);
        }

        let message = self.message("Remove");
        self.commit(target, compile(None), message).map(Some)
    }

    fn message(&self, action: &str) -> String {
        format!(
            "{}{action} {}",
            self.config.commit_message_prefix, self.config.owners_path
        )
    }

    fn commit(
        &self,
        target: &BranchTarget,
        content: Vec<u8>,
        message: String,
    ) -> Result<CommitOutcome> {
        let request = SignedCommitRequest {
            repo_owner: target.repository_owner.clone(),
            repo_name: target.repository_name.clone(),
            branch: target.branch.clone(),
            message,
            changes: vec![CommitChange::new(&self.config.owners_path, content)],
            author_name: self.config.username.clone(),
            author_email: self.config.email.clone(),
            signing_key: self.config.signing_key().map(str::to_string),
            signing_passphrase: self.config.gpg_passphrase.clone(),
        };

        let outcome = CommitBuilder::new(&self.api)
            .with_clock(self.clock)
            .commit(request)?;
        Ok(outcome)
    }
}
