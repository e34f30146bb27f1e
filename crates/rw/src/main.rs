//! RW CLI - Sidebar navigation tooling.
//!
//! Provides commands for:
//! - `sidebars check`: Validate sidebars and their document references
//! - `sidebars show`: Print normalized sidebars as JSON
//! - `sidebars list`: List sidebars in navigation order

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::SidebarsCommand;
use output::Output;

/// RW - Documentation navigation tooling.
#[derive(Parser)]
#[command(name = "rw", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sidebar navigation commands.
    #[command(subcommand)]
    Sidebars(SidebarsCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Sidebars(cmd) => cmd.verbose(),
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Sidebars(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
