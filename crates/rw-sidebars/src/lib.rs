//! Sidebar navigation trees for RW.
//!
//! Turns hand-authored sidebar declarations into validated, render-ready
//! navigation trees.
//!
//! # Architecture
//!
//! - [`raw`]: permissive input grammar, deserialized from YAML or JSON
//! - [`builder`]: validation and normalization into [`NavigationTree`]s
//! - [`resolver`]: [`ContentResolver`] seam for checking document references
//! - [`loader`]: sidebars file loading
//! - [`navbar`]: navbar items referencing sidebars and documents
//!
//! Building is a pure, single-pass transformation: either every sidebar
//! builds or the first [`ConfigurationError`] is returned. Checking that
//! referenced documents exist is a separate step ([`check_references`]).
//!
//! # Example
//!
//! ```
//! use rw_sidebars::{BuildOptions, TreeDefaults, build_sidebars, parse_sidebars_yaml};
//!
//! let raw = parse_sidebars_yaml("
//! cloudGatewaySidebar:
//!   - gateway/index
//!   - gateway/getting-started
//! ").unwrap();
//!
//! let options = BuildOptions::new(TreeDefaults::new(true, true));
//! let sidebars = build_sidebars(&raw, &options).unwrap();
//!
//! let gateway = sidebars.get("cloudGatewaySidebar").unwrap();
//! assert_eq!(gateway.first_doc_id(), Some("gateway/index"));
//! ```

pub mod builder;
pub mod entry;
mod error;
pub mod loader;
pub mod navbar;
pub mod raw;
pub mod resolver;

use std::path::Path;

pub use builder::{BuildOptions, SidebarsBuilder, TreeDefaults, build_sidebars, build_tree};
pub use entry::{
    Category, CategoryLink, DocRef, Html, Link, NavigationEntry, NavigationTree, Sidebars,
};
pub use error::{
    ConfigurationError, ConfigurationErrorKind, EntryPath, LoadError, NavbarError,
    NavbarErrorKind, NavbarErrors, ReferenceError, ReferenceErrors, SidebarError,
};
pub use loader::{load_sidebars, parse_sidebars_json, parse_sidebars_yaml};
pub use navbar::{NavbarItem, NavbarPosition, check_navbar};
pub use raw::{InvalidField, RawCategoryLink, RawEntry, RawItem, RawSidebars, RawTree};
#[cfg(any(test, feature = "mock"))]
pub use resolver::MockContentResolver;
pub use resolver::{ContentResolver, FsContentResolver, ResolvedDoc, check_references};

/// Load, build and, when a resolver is given, check a sidebars file.
///
/// # Errors
///
/// Returns the first failure of loading, building or reference checking.
pub fn load_and_build(
    path: &Path,
    options: &BuildOptions,
    resolver: Option<&dyn ContentResolver>,
) -> Result<Sidebars, SidebarError> {
    let raw = load_sidebars(path)?;
    let sidebars = build_sidebars(&raw, options)?;
    if let Some(resolver) = resolver {
        check_references(&sidebars, resolver)?;
    }
    Ok(sidebars)
}
