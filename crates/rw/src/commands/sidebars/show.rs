//! `rw sidebars show` command implementation.

use clap::Args;

use super::{SourceArgs, build_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sidebars show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Sidebar to print (default: all sidebars).
    name: Option<String>,

    /// Pretty-print JSON.
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl ShowArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load_config()?;
        let sidebars = build_from_config(&config)?;

        let json = match &self.name {
            Some(name) => {
                let tree = sidebars.get(name).ok_or_else(|| {
                    CliError::Validation(format!("No sidebar named '{name}'"))
                })?;
                to_json(tree, self.pretty)?
            }
            None => to_json(&sidebars, self.pretty)?,
        };

        output.data(&json);
        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    Ok(json?)
}
