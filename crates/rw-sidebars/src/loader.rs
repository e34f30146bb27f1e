//! Sidebars file loading.
//!
//! Sidebars are declared in a YAML (`.yaml`, `.yml`) or JSON (`.json`) file
//! mapping sidebar names to item lists:
//!
//! ```yaml
//! guidesSidebar:
//!   - guides/index
//!   - type: category
//!     label: Deployment Methods
//!     collapsed: false
//!     items:
//!       - guides/simple-integration
//! ```
//!
//! JSON files nest to any depth. YAML files are bounded by the YAML
//! parser's recursion limit of 128 nested collections; each category
//! level takes two (its mapping and its `items` list), so YAML sidebars
//! nest up to about 60 categories deep and fail with [`LoadError::Parse`]
//! beyond that.

use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::raw::RawSidebars;

/// Load raw sidebars from a file, choosing the parser by extension.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, has an unknown
/// extension, or does not match the sidebar grammar.
pub fn load_sidebars(path: &Path) -> Result<RawSidebars, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let parse: fn(&str) -> Result<RawSidebars, LoadError> = match extension.as_deref() {
        Some("yaml" | "yml") => parse_sidebars_yaml,
        Some("json") => parse_sidebars_json,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let sidebars = parse(&content)?;
    tracing::debug!(path = %path.display(), sidebars = sidebars.len(), "Loaded sidebars file");
    Ok(sidebars)
}

/// Parse raw sidebars from YAML.
///
/// Empty content yields an empty set.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if the YAML is malformed.
pub fn parse_sidebars_yaml(content: &str) -> Result<RawSidebars, LoadError> {
    if content.trim().is_empty() {
        return Ok(RawSidebars::default());
    }
    serde_yaml::from_str(content).map_err(|e| LoadError::Parse(format!("Invalid YAML: {e}")))
}

/// Parse raw sidebars from JSON.
///
/// Nesting depth is unbounded; the stack grows on demand.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if the JSON is malformed.
pub fn parse_sidebars_json(content: &str) -> Result<RawSidebars, LoadError> {
    let invalid = |e: serde_json::Error| LoadError::Parse(format!("Invalid JSON: {e}"));

    let mut deserializer = serde_json::Deserializer::from_str(content);
    deserializer.disable_recursion_limit();
    let sidebars = RawSidebars::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(invalid)?;
    deserializer.end().map_err(invalid)?;
    Ok(sidebars)
}
