//! `rw sidebars check` command implementation.

use clap::Args;
use rw_config::Config;
use rw_sidebars::{ContentResolver, FsContentResolver, Sidebars, check_navbar, check_references};

use super::{SourceArgs, build_from_config, resolver_for};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sidebars check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only validate structure, skip document reference checks.
    #[arg(long)]
    no_resolve: bool,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load_config()?;

        output.info(&format!(
            "Sidebars: {}",
            config.sidebars_resolved.path.display()
        ));
        if self.no_resolve {
            output.warning("Document references: not checked (--no-resolve)");
        } else {
            output.info(&format!(
                "Source directory: {}",
                config.docs_resolved.source_dir.display()
            ));
        }

        let resolver = (!self.no_resolve).then(|| resolver_for(&config));
        let sidebars = run_checks(&config, resolver.as_ref())?;

        let docs: usize = sidebars.iter().map(|tree| tree.doc_ids().len()).sum();
        output.success(&format!(
            "{} sidebar(s) valid, {docs} document reference(s), {} navbar item(s)",
            sidebars.len(),
            config.navbar.items.len()
        ));
        Ok(())
    }
}

/// Build every sidebar, then check document references and the navbar.
fn run_checks(
    config: &Config,
    resolver: Option<&FsContentResolver>,
) -> Result<Sidebars, CliError> {
    let sidebars = build_from_config(config)?;
    let resolver = resolver.map(|r| r as &dyn ContentResolver);

    if let Some(resolver) = resolver {
        check_references(&sidebars, resolver)?;
    }
    check_navbar(&config.navbar.items, &sidebars, resolver)?;

    Ok(sidebars)
}
