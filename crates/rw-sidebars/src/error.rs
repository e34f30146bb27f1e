//! Error types for sidebar building.
//!
//! Every error carries enough context to point an author at the offending
//! entry: the sidebar name and the path from the sidebar root.

use std::fmt;
use std::path::PathBuf;

/// Position of an entry inside a sidebar, from the root.
///
/// Displayed as a chain of indices and field names, e.g. `[6].items[0].items[1]`.
/// The empty path denotes the sidebar itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryPath(Vec<Segment>);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Index(usize),
    Field(&'static str),
}

impl EntryPath {
    /// Path pointing at the sidebar root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend the path with a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// Extend the path with a field name.
    #[must_use]
    pub fn field(&self, name: &'static str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name));
        Self(segments)
    }

    /// Whether this path points at the sidebar root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Index(idx) => write!(f, "[{idx}]")?,
                Segment::Field(name) if i == 0 => write!(f, "{name}")?,
                Segment::Field(name) => write!(f, ".{name}")?,
            }
        }
        Ok(())
    }
}

/// Rule violated by a malformed sidebar entry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationErrorKind {
    /// `type` is not one of the recognized entry kinds.
    #[error("unrecognized entry type '{0}'")]
    UnknownType(String),
    /// Entry object declares neither `type` nor `id`.
    #[error("entry has no 'type'")]
    MissingType,
    /// A field required by the entry type is absent or empty.
    #[error("missing required field '{field}' for type '{entry_type}'")]
    MissingField {
        /// Entry type being validated.
        entry_type: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },
    /// A field is not part of the grammar for the entry type.
    #[error("field '{field}' is not allowed for type '{entry_type}'")]
    UnexpectedField {
        /// Entry type being validated.
        entry_type: &'static str,
        /// Name of the offending field.
        field: String,
    },
    /// A known field holds a value of the wrong type.
    #[error("field '{field}' must be {expected}")]
    InvalidFieldType {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the accepted value.
        expected: &'static str,
    },
    /// A list item is neither a document id nor an entry object.
    #[error("item must be a document id or an entry object, found {0}")]
    InvalidItem(&'static str),
    /// Category declares no children.
    #[error("category '{0}' has no items")]
    EmptyCategory(String),
    /// Category is declared collapsed but not collapsible.
    #[error("category '{0}' cannot be collapsed when it is not collapsible")]
    CollapsedNotCollapsible(String),
    /// Sidebar declares no entries.
    #[error("sidebar has no entries")]
    EmptyTree,
    /// Two siblings reference the same document.
    #[error("document '{0}' appears more than once at the same level")]
    DuplicateSibling(String),
    /// Document id is not a valid identifier.
    #[error("invalid document id '{id}': {reason}")]
    InvalidDocId {
        /// Offending id.
        id: String,
        /// Why the id was rejected.
        reason: &'static str,
    },
    /// Two sidebars registered under the same name.
    #[error("sidebar '{0}' is registered more than once")]
    DuplicateTree(String),
}

/// Malformed or incomplete navigation configuration.
///
/// Always fatal: a broken sidebar must not be published.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigurationError {
    tree: Option<String>,
    path: EntryPath,
    kind: ConfigurationErrorKind,
}

impl ConfigurationError {
    pub(crate) fn new(kind: ConfigurationErrorKind, path: EntryPath) -> Self {
        Self {
            tree: None,
            path,
            kind,
        }
    }

    /// Attach the sidebar name.
    #[must_use]
    pub(crate) fn in_tree(mut self, tree: &str) -> Self {
        self.tree = Some(tree.to_owned());
        self
    }

    /// Sidebar the error occurred in, if known.
    #[must_use]
    pub fn tree(&self) -> Option<&str> {
        self.tree.as_deref()
    }

    /// Path of the offending entry from the sidebar root.
    #[must_use]
    pub fn path(&self) -> &EntryPath {
        &self.path
    }

    /// Violated rule.
    #[must_use]
    pub fn kind(&self) -> &ConfigurationErrorKind {
        &self.kind
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self.kind, ConfigurationErrorKind::DuplicateTree(_)) {
            return write!(f, "{}", self.kind);
        }
        match &self.tree {
            Some(tree) if self.path.is_root() => write!(f, "sidebar '{tree}': {}", self.kind),
            Some(tree) => write!(f, "sidebar '{tree}' at {}: {}", self.path, self.kind),
            None if self.path.is_root() => write!(f, "{}", self.kind),
            None => write!(f, "at {}: {}", self.path, self.kind),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Document reference that does not resolve to any content document.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("sidebar '{tree}' at {path}: document '{id}' not found")]
pub struct ReferenceError {
    /// Sidebar containing the reference.
    pub tree: String,
    /// Path of the referencing entry.
    pub path: EntryPath,
    /// Unresolved document id.
    pub id: String,
}

/// All unresolved references found in a sidebar set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceErrors(pub Vec<ReferenceError>);

impl ReferenceErrors {
    /// Individual unresolved references, in sidebar order.
    #[must_use]
    pub fn errors(&self) -> &[ReferenceError] {
        &self.0
    }
}

impl fmt::Display for ReferenceErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unresolved document reference(s)", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ReferenceErrors {}

/// Rule violated by a navbar item.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum NavbarErrorKind {
    /// `docSidebar` item names a sidebar that is not defined.
    #[error("sidebar '{0}' is not defined")]
    UnknownSidebar(String),
    /// `doc` item names a document that does not exist.
    #[error("document '{0}' not found")]
    UnresolvedDoc(String),
    /// `link` item has neither or both of `href` and `to`, or an empty one.
    #[error("link '{0}' needs exactly one non-empty 'href' or 'to'")]
    LinkTarget(String),
}

/// Navbar item that does not point at anything.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("navbar item {index}: {kind}")]
pub struct NavbarError {
    /// Position of the item in the navbar, from zero.
    pub index: usize,
    /// Violated rule.
    pub kind: NavbarErrorKind,
}

/// All problems found in a navbar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavbarErrors(pub Vec<NavbarError>);

impl NavbarErrors {
    /// Individual problems, in navbar order.
    #[must_use]
    pub fn errors(&self) -> &[NavbarError] {
        &self.0
    }
}

impl fmt::Display for NavbarErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} broken navbar item(s)", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for NavbarErrors {}

/// Error reading a sidebars file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error reading the file.
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// File content is not valid YAML or JSON for the sidebar grammar.
    #[error("Cannot parse sidebars: {0}")]
    Parse(String),
    /// File extension is not recognized.
    #[error("Unsupported sidebars file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Any failure producing a validated sidebar set.
#[derive(Debug, thiserror::Error)]
pub enum SidebarError {
    /// Malformed configuration.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
    /// Unresolved document references.
    #[error("{0}")]
    Reference(#[from] ReferenceErrors),
    /// Sidebars file could not be loaded.
    #[error("{0}")]
    Load(#[from] LoadError),
}
