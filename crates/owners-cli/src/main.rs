//! owners CLI
//!
//! Keeps the owners file of a local repository in line with a rules document,
//! committing (and optionally signing) only when the file has drifted.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;
    tracing::debug!(?cli, "Parsed arguments");

    let context = Context::open(&cli.repo, cli.config.as_deref())?;

    match cli.command {
        Commands::Show { branch, json } => commands::run_show(&context, &branch, json),
        Commands::Check { branch, rules } => commands::run_check(&context, &branch, &rules),
        Commands::Apply {
            branch,
            rules,
            dry_run,
        } => commands::run_apply(&context, &branch, &rules, dry_run),
        Commands::Clear { branch } => commands::run_clear(&context, &branch),
    }
}
