//! Owners file parsing, generation and comparison.
//!
//! An owners file maps path patterns to the people responsible for them:
//!
//! ```text
//! # automatically generated by owners - please do not edit here
//! *.rs @alice @bob
//! docs/ carol@example.com
//! ```
//!
//! The crate is split the same way the file's lifecycle is:
//!
//! - [`parser`] turns raw text into a [`Ruleset`]. Parsing is lenient and never
//!   fails: comments, blank lines and lines without owners are dropped.
//! - [`writer`] compiles a [`Ruleset`] back into file content.
//! - [`ruleset`] holds the in-memory model and its order-independent equality.

pub mod parser;
pub mod rule;
pub mod ruleset;
pub mod writer;

pub use parser::{parse, parse_bytes};
pub use rule::{Rule, normalize_owner};
pub use ruleset::{Ruleset, same_owners};
pub use writer::{GENERATED_HEADER, compile};
