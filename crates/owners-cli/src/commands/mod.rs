//! Command implementations for owners-cli

pub mod apply;
pub mod check;
pub mod clear;
pub mod show;

pub use apply::run_apply;
pub use check::run_check;
pub use clear::run_clear;
pub use show::run_show;

use std::path::Path;

use colored::Colorize;
use owners_core::DesiredRules;
use owners_rules::{Rule, Ruleset};

use crate::error::Result;

/// Load and validate a rules document.
fn load_rules(path: &Path) -> Result<Ruleset> {
    Ok(DesiredRules::load(path)?.into_ruleset()?)
}

fn print_rule(marker: colored::ColoredString, rule: &Rule) {
    let owners: Vec<String> = rule.owner_tokens().collect();
    println!("  {} {} {}", marker, rule.pattern.cyan(), owners.join(" "));
}
