//! `rw sidebars list` command implementation.

use clap::Args;
use rw_sidebars::ContentResolver;

use super::{SourceArgs, build_from_config, resolver_for};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sidebars list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl ListArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load_config()?;
        let sidebars = build_from_config(&config)?;
        let resolver = resolver_for(&config);

        for tree in sidebars.iter() {
            output.highlight(tree.name());
            output.info(&format!(
                "  {} entries, {} documents",
                tree.entries().len(),
                tree.doc_ids().len()
            ));
            output.info(&format!(
                "  landing page: {}",
                landing_page(tree.first_doc_id(), &resolver)
            ));
        }
        Ok(())
    }
}

/// Describe a sidebar's first document by title and URL.
fn landing_page(id: Option<&str>, resolver: &dyn ContentResolver) -> String {
    match id {
        None => "-".to_owned(),
        Some(id) => match resolver.resolve(id) {
            Some(doc) => format!("{} ({})", doc.title, doc.path),
            None => format!("{id} (missing)"),
        },
    }
}
