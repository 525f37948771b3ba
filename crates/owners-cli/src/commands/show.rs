//! Show command implementation

use std::process::ExitCode;

use colored::Colorize;
use serde_json::json;

use crate::context::Context;
use crate::error::Result;

/// Run the show command
pub fn run_show(context: &Context, branch: &str, json: bool) -> Result<ExitCode> {
    let target = context.target(branch);
    let current = context.service.read(&target)?;

    if json {
        let output = json!({
            "branch": branch,
            "path": context.owners_path(),
            "exists": current.is_some(),
            "rules": current,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(ruleset) = current else {
        println!(
            "{} {} on {}",
            "No owners file at".yellow(),
            context.owners_path(),
            branch.cyan()
        );
        return Ok(ExitCode::SUCCESS);
    };

    println!("{} ({} on {})", "Owners".bold(), context.owners_path(), branch.cyan());
    if ruleset.is_empty() {
        println!("  {}", "No rules".dimmed());
    }
    for rule in &ruleset {
        super::print_rule("-".dimmed(), rule);
    }

    Ok(ExitCode::SUCCESS)
}
