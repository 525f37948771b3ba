//! Owners file reconciliation.
//!
//! Ties the rule engine and the commit builder together: read the owners file
//! on a branch, compare it with the rules it should contain, and commit the
//! regenerated file only when the two differ.
//!
//! # Example
//!
//! ```no_run
//! use owners_core::{DesiredRules, OwnersService, ProviderConfig};
//! use owners_git::LocalRepository;
//!
//! # fn main() -> owners_core::Result<()> {
//! let config = ProviderConfig::load("owners.toml")?;
//! let service = OwnersService::new(LocalRepository::open(".")?, config)?;
//!
//! let desired = DesiredRules::load("rules.toml")?.into_ruleset()?;
//! let file = owners_core::BranchTarget::new("acme", "widgets", "main").with_ruleset(desired);
//! service.apply(&file)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod desired;
pub mod error;
pub mod file;
pub mod service;

pub use config::{DEFAULT_OWNERS_PATH, ProviderConfig};
pub use desired::DesiredRules;
pub use error::{Error, Result};
pub use file::{BranchTarget, OwnersFile};
pub use service::{ApplyOutcome, ApplyPlan, OwnersService};
