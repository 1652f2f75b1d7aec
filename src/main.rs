//! texforge CLI - LaTeX templates to PDF
//!
//! Usage: texforge <COMMAND>
//!
//! Commands:
//!   build   Render and compile a single document
//!   batch   Compile every document in a manifest, in parallel
//!   watch   Rebuild a document whenever its sources change
//!   clean   Remove LaTeX byproducts

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build(args) => commands::build::cmd_build(args, cli.json),
        Commands::Batch(args) => commands::batch::cmd_batch(args, cli.json),
        Commands::Watch(args) => commands::watch::cmd_watch(args, cli.json),
        Commands::Clean { dir } => commands::clean::cmd_clean(&dir, cli.json),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("TEXFORGE_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
