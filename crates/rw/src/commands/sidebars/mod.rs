//! `rw sidebars` subcommand group.

mod check;
mod list;
mod show;

use std::path::PathBuf;

use clap::{Args, Subcommand};
use rw_config::{CliSettings, Config};
use rw_sidebars::{FsContentResolver, Sidebars, build_sidebars, load_sidebars};

use check::CheckArgs;
use list::ListArgs;
use show::ShowArgs;

use crate::error::CliError;

/// Sidebar commands.
#[derive(Subcommand)]
pub(crate) enum SidebarsCommand {
    /// Validate sidebars and check document references.
    Check(CheckArgs),
    /// Print normalized sidebars as JSON.
    Show(ShowArgs),
    /// List sidebars with entry counts.
    List(ListArgs),
}

impl SidebarsCommand {
    /// Execute the sidebars subcommand.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Check(args) => args.execute(),
            Self::Show(args) => args.execute(),
            Self::List(args) => args.execute(),
        }
    }

    /// Whether `--verbose` was passed.
    pub(crate) fn verbose(&self) -> bool {
        match self {
            Self::Check(args) => args.source.verbose,
            Self::Show(args) => args.source.verbose,
            Self::List(args) => args.source.verbose,
        }
    }
}

/// Arguments shared by every sidebars command.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sidebars file (overrides config).
    #[arg(long)]
    sidebars: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Site base URL (overrides config).
    #[arg(long)]
    base_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            sidebars_path: self.sidebars.clone(),
            base_url: self.base_url.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Load and build every sidebar declared by the configuration.
pub(crate) fn build_from_config(config: &Config) -> Result<Sidebars, CliError> {
    let raw = load_sidebars(&config.sidebars_resolved.path)?;
    let sidebars = build_sidebars(&raw, &config.build_options())?;
    tracing::info!(
        path = %config.sidebars_resolved.path.display(),
        sidebars = sidebars.len(),
        "Sidebars built"
    );
    Ok(sidebars)
}

/// Resolver over the configured docs directory.
pub(crate) fn resolver_for(config: &Config) -> FsContentResolver {
    FsContentResolver::new(
        config.docs_resolved.source_dir.clone(),
        &config.docs_resolved.route_base_path,
    )
}
