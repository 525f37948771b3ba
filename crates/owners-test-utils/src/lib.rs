//! Shared test utilities for the owners-manager workspace.
//!
//! Fixtures used by more than one crate's tests live here. Dev-dependency
//! only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures built with `git2`
//! - [`keys`]: armored OpenPGP secret keys for signing tests
//! - [`repo`]: [`TestRepo`](repo::TestRepo), a temporary repository with a seeded branch

pub mod git;
pub mod keys;
pub mod repo;
