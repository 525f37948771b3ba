//! Clear command implementation

use std::process::ExitCode;

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Run the clear command
pub fn run_clear(context: &Context, branch: &str) -> Result<ExitCode> {
    match context.service.clear(&context.target(branch))? {
        Some(commit) => println!(
            "{} {} on {} as {}",
            "Cleared".green().bold(),
            context.owners_path(),
            branch.cyan(),
            commit.sha
        ),
        None => println!(
            "{} {} on {}",
            "No owners file at".yellow(),
            context.owners_path(),
            branch.cyan()
        ),
    }

    Ok(ExitCode::SUCCESS)
}
