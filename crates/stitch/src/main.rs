//! Stitch CLI - documentation navigation builder.
//!
//! Provides commands for:
//! - `build`: Build one documentation set's navigation
//! - `assemble`: Compose every configured repository into one site
//! - `codex`: Compose a codex portal of independent sets
//! - `check-prefixes`: Validate that repositories don't share URL folders

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AssembleArgs, BuildArgs, CheckPrefixesArgs, CodexArgs};
use output::Output;

/// Stitch - documentation navigation builder.
#[derive(Parser)]
#[command(name = "stitch", version, about)]
struct Cli {
    /// Enable verbose output (timing and progress logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the navigation of a single documentation set.
    Build(BuildArgs),
    /// Assemble the site navigation from every repository checkout.
    Assemble(AssembleArgs),
    /// Compose the codex portal navigation.
    Codex(CodexArgs),
    /// Check published links for URL prefix collisions.
    CheckPrefixes(CheckPrefixesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Assemble(args) => args.execute(),
        Commands::Codex(args) => args.execute(),
        Commands::CheckPrefixes(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
