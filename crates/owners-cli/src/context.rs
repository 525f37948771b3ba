//! Repository and configuration discovery

use std::path::Path;

use git2::Repository;
use owners_core::{BranchTarget, OwnersService, ProviderConfig};
use owners_git::LocalRepository;

use crate::error::Result;

/// Owner recorded for local repositories, which have none.
const LOCAL_OWNER: &str = "local";

/// Everything a command needs: the service and how to address branches.
pub struct Context {
    pub service: OwnersService<LocalRepository>,
    repository_name: String,
}

impl Context {
    /// Discover the repository containing `path` and load the configuration.
    ///
    /// Without a configuration file, every value comes from the environment.
    pub fn open(path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let root = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        let config = match config_path {
            Some(config_path) => ProviderConfig::load(config_path)?,
            None => ProviderConfig::default(),
        }
        .with_env();
        tracing::debug!(?config, root = %root.display(), "Opened repository");

        let repository_name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "repository".to_string());

        Ok(Self {
            service: OwnersService::new(LocalRepository::from_repository(repo), config)?,
            repository_name,
        })
    }

    pub fn target(&self, branch: &str) -> BranchTarget {
        BranchTarget::new(LOCAL_OWNER, &self.repository_name, branch)
    }

    pub fn owners_path(&self) -> &str {
        &self.service.config().owners_path
    }
}
