//! Apply command implementation

use std::path::Path;
use std::process::ExitCode;

use colored::Colorize;
use owners_core::ApplyOutcome;

use crate::context::Context;
use crate::error::Result;

/// Run the apply command
pub fn run_apply(context: &Context, branch: &str, rules: &Path, dry_run: bool) -> Result<ExitCode> {
    let desired = super::load_rules(rules)?;
    let target = context.target(branch);

    if dry_run {
        let plan = context.service.plan(&target, &desired)?;
        if plan.is_up_to_date() {
            println!("{} is up to date", context.owners_path());
        } else {
            println!(
                "{} {} on {}:",
                "Would write".yellow(),
                context.owners_path(),
                branch.cyan()
            );
            print!("{}", String::from_utf8_lossy(&plan.content()));
        }
        return Ok(ExitCode::SUCCESS);
    }

    match context.service.apply(&target.with_ruleset(desired))? {
        ApplyOutcome::Unchanged => {
            println!("{} is up to date", context.owners_path());
        }
        ApplyOutcome::Committed(commit) => {
            let signed = if commit.signed { " (signed)" } else { "" };
            println!(
                "{} {} on {} as {}{}",
                "Updated".green().bold(),
                context.owners_path(),
                branch.cyan(),
                commit.sha,
                signed
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
