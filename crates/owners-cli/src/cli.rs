//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// owners - Manage the CODEOWNERS file of a repository
#[derive(Parser, Debug)]
#[command(name = "owners")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (committer identity, signing key, owners path)
    ///
    /// Values missing from the file are taken from GITHUB_USERNAME,
    /// GITHUB_EMAIL, GPG_SECRET_KEY, GPG_PASSPHRASE and COMMIT_MESSAGE_PREFIX.
    #[arg(short, long, global = true, env = "OWNERS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Repository to operate on
    #[arg(short, long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the rules of the current owners file
    Show {
        /// Branch to read
        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Compare the owners file with a rules document
    ///
    /// Exits with status 2 when the file has drifted.
    Check {
        /// Branch to read
        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Rules document (TOML, one [[rule]] table per line of the file)
        #[arg(long)]
        rules: PathBuf,
    },

    /// Commit the owners file generated from a rules document
    ///
    /// Nothing is committed when the branch already holds the same rules.
    Apply {
        /// Branch to commit to
        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Rules document
        #[arg(long)]
        rules: PathBuf,

        /// Print the generated file instead of committing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Commit an empty owners file
    Clear {
        /// Branch to commit to
        #[arg(short, long, default_value = "main")]
        branch: String,
    },
}
