//! CLI error types.

use rw_config::ConfigError;
use rw_sidebars::{ConfigurationError, LoadError, NavbarErrors, ReferenceErrors};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Sidebar(#[from] ConfigurationError),

    #[error("{0}")]
    Reference(#[from] ReferenceErrors),

    #[error("{0}")]
    Navbar(#[from] NavbarErrors),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
