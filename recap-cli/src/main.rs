//! recap: wrap serverless function handlers with recap.dev instrumentation.
//!
//! # Usage
//!
//! ```text
//! recap run   [--service-dir <dir>] [--config <file>] [--prefix <dir>] [--dry-run] [--output <file>]
//! recap clean [--service-dir <dir>] [--config <file>]
//! recap hook  <event> [--dry-run] [--output <file>]
//! recap list  [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{clean::CleanArgs, hook::HookArgs, list::ListArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "recap",
    version,
    about = "Automatically wraps your function handlers with recap.dev",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates recap.dev handlers and rewrites function handlers to use them.
    Run(RunArgs),

    /// Cleans up generated recap.dev handler files.
    Clean(CleanArgs),

    /// Runs the action bound to a host lifecycle event.
    Hook(HookArgs),

    /// Shows which functions would be wrapped, and why others are skipped.
    List(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Clean(args) => args.run(),
        Commands::Hook(args) => args.run(),
        Commands::List(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
