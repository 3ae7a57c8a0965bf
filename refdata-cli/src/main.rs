//! Refdata — reference-dataset synchronization CLI.
//!
//! # Usage
//!
//! ```text
//! refdata sync [--root <dir>] [--config <file>] [--dataset <name>] [--no-publish] [--json]
//! refdata check [--root <dir>] [--config <file>] [--dataset <name>]
//! refdata status [--root <dir>] [--config <file>] [--json]
//! ```

mod commands;
mod git;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, status::StatusArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "refdata",
    version,
    about = "Keep local reference datasets in sync with their upstream releases",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, transform, and persist every stale dataset.
    Sync(SyncArgs),

    /// Report which datasets have a newer upstream release, without writing.
    Check(CheckArgs),

    /// Show stored versions and artifacts from the last run.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
