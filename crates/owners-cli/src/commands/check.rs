//! Check command implementation

use std::path::Path;
use std::process::ExitCode;

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Exit status reported when the owners file differs from the rules.
pub const DRIFT_EXIT_CODE: u8 = 2;

/// Run the check command
pub fn run_check(context: &Context, branch: &str, rules: &Path) -> Result<ExitCode> {
    let desired = super::load_rules(rules)?;
    let plan = context.service.plan(&context.target(branch), &desired)?;

    if plan.is_up_to_date() {
        println!("{} {} is up to date", "OK".green().bold(), context.owners_path());
        return Ok(ExitCode::SUCCESS);
    }

    match &plan.current {
        None => println!(
            "{} {} does not exist on {}",
            "drift".yellow().bold(),
            context.owners_path(),
            branch.cyan()
        ),
        Some(current) => {
            println!(
                "{} {} differs from {}",
                "drift".yellow().bold(),
                context.owners_path(),
                rules.display()
            );
            for rule in current.missing_from(&desired) {
                super::print_rule("-".red(), rule);
            }
            for rule in desired.missing_from(current) {
                super::print_rule("+".green(), rule);
            }
        }
    }

    Ok(ExitCode::from(DRIFT_EXIT_CODE))
}
