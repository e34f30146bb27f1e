//! Navigation tree builder.
//!
//! Validates raw sidebar items and normalizes them into [`NavigationTree`]s.
//! The builder is a single recursive pass over the entry grammar; it holds
//! no state between calls and performs no I/O.
//!
//! # Example
//!
//! ```
//! use rw_sidebars::{BuildOptions, RawEntry, RawItem, TreeDefaults, build_tree};
//!
//! let raw = vec![
//!     RawItem::doc("guides/index"),
//!     RawEntry::category("Deployment", vec![RawItem::doc("guides/simple")]).into(),
//! ];
//! let options = BuildOptions::new(TreeDefaults::new(true, true));
//!
//! let tree = build_tree("guidesSidebar", &raw, &options).unwrap();
//! assert_eq!(tree.entries().len(), 2);
//! ```

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::entry::{
    Category, CategoryLink, DocRef, Html, Link, NavigationEntry, NavigationTree, Sidebars,
};
use crate::error::{ConfigurationError, ConfigurationErrorKind, EntryPath};
use crate::raw::{RawCategoryLink, RawEntry, RawItem, RawSidebars};

const DOC_FIELDS: &[&str] = &["id", "label", "className"];
const CATEGORY_FIELDS: &[&str] = &[
    "label",
    "items",
    "collapsed",
    "collapsible",
    "link",
    "className",
];
const LINK_FIELDS: &[&str] = &["label", "href", "autoAddBaseUrl", "className"];
const HTML_FIELDS: &[&str] = &["value", "defaultStyle", "className"];
const DOC_LINK_FIELDS: &[&str] = &["id"];
const GENERATED_INDEX_FIELDS: &[&str] = &["title", "description", "slug"];

/// Default collapse policy for the categories of one sidebar.
///
/// No `Default` impl: every call site states its own policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeDefaults {
    /// Whether categories without an explicit `collapsed` start collapsed.
    pub collapsed: bool,
    /// Whether categories without an explicit `collapsible` can collapse.
    pub collapsible: bool,
}

impl TreeDefaults {
    /// Create a policy.
    #[must_use]
    pub const fn new(collapsed: bool, collapsible: bool) -> Self {
        Self {
            collapsed,
            collapsible,
        }
    }
}

/// Options applied while building sidebars.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    base_url: String,
    defaults: TreeDefaults,
    tree_defaults: HashMap<String, TreeDefaults>,
}

impl BuildOptions {
    /// Create options with the given category policy and base URL `/`.
    #[must_use]
    pub fn new(defaults: TreeDefaults) -> Self {
        Self {
            base_url: "/".to_owned(),
            defaults,
            tree_defaults: HashMap::new(),
        }
    }

    /// Set the site base URL prefixed to site-relative links.
    ///
    /// Leading and trailing slashes are added when missing.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Override the category policy for one sidebar.
    #[must_use]
    pub fn with_tree_defaults(mut self, tree: impl Into<String>, defaults: TreeDefaults) -> Self {
        self.tree_defaults.insert(tree.into(), defaults);
        self
    }

    /// Site base URL, always starting and ending with `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Category policy in effect for a sidebar.
    #[must_use]
    pub fn defaults_for(&self, tree: &str) -> TreeDefaults {
        self.tree_defaults
            .get(tree)
            .copied()
            .unwrap_or(self.defaults)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}

/// Per-sidebar state threaded through the recursion.
struct Context<'a> {
    defaults: TreeDefaults,
    base_url: &'a str,
}

/// Build one sidebar from its raw items.
///
/// # Errors
///
/// Returns the first [`ConfigurationError`] in document order.
pub fn build_tree(
    name: &str,
    raw: &[RawItem],
    options: &BuildOptions,
) -> Result<NavigationTree, ConfigurationError> {
    if raw.is_empty() {
        return Err(
            ConfigurationError::new(ConfigurationErrorKind::EmptyTree, EntryPath::root())
                .in_tree(name),
        );
    }

    let ctx = Context {
        defaults: options.defaults_for(name),
        base_url: options.base_url(),
    };
    let entries = build_items(raw, &EntryPath::root(), &ctx).map_err(|e| e.in_tree(name))?;

    tracing::debug!(sidebar = name, entries = entries.len(), "Built sidebar");
    Ok(NavigationTree::new(name.to_owned(), entries))
}

/// Build every sidebar of a raw set, preserving declaration order.
///
/// # Errors
///
/// Returns the first [`ConfigurationError`], including duplicate sidebar names.
pub fn build_sidebars(
    raw: &RawSidebars,
    options: &BuildOptions,
) -> Result<Sidebars, ConfigurationError> {
    let mut builder = SidebarsBuilder::new(options.clone());
    for (name, items) in raw.iter() {
        builder.add(name, items)?;
    }
    Ok(builder.build())
}

/// Explicit registry of named sidebars.
///
/// Each sidebar is validated as it is added; registering a name twice fails.
pub struct SidebarsBuilder {
    options: BuildOptions,
    trees: IndexMap<String, NavigationTree>,
}

impl SidebarsBuilder {
    /// Create an empty registry.
    #[must_use]
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            trees: IndexMap::new(),
        }
    }

    /// Validate and register a sidebar.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationErrorKind::DuplicateTree`] if `name` is already
    /// registered, or any error from [`build_tree`].
    pub fn add(&mut self, name: &str, raw: &[RawItem]) -> Result<&mut Self, ConfigurationError> {
        if self.trees.contains_key(name) {
            return Err(ConfigurationError::new(
                ConfigurationErrorKind::DuplicateTree(name.to_owned()),
                EntryPath::root(),
            )
            .in_tree(name));
        }
        let tree = build_tree(name, raw, &self.options)?;
        self.trees.insert(name.to_owned(), tree);
        Ok(self)
    }

    /// Finish registration.
    #[must_use]
    pub fn build(self) -> Sidebars {
        Sidebars::new(self.trees)
    }
}

fn build_items(
    items: &[RawItem],
    list_path: &EntryPath,
    ctx: &Context<'_>,
) -> Result<Vec<NavigationEntry>, ConfigurationError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let path = list_path.index(idx);
        let entry = build_item(item, &path, ctx)?;
        if let NavigationEntry::Doc(doc) = &entry
            && !seen.insert(doc.id.clone())
        {
            return Err(ConfigurationError::new(
                ConfigurationErrorKind::DuplicateSibling(doc.id.clone()),
                path,
            ));
        }
        entries.push(entry);
    }

    Ok(entries)
}

fn build_item(
    item: &RawItem,
    path: &EntryPath,
    ctx: &Context<'_>,
) -> Result<NavigationEntry, ConfigurationError> {
    match item {
        RawItem::Shorthand(id) => {
            validate_doc_id(id, path)?;
            Ok(NavigationEntry::Doc(DocRef {
                id: id.clone(),
                label: None,
                class_name: None,
            }))
        }
        RawItem::Entry(entry) => build_entry(entry, path, ctx),
        RawItem::Invalid(value) => Err(ConfigurationError::new(
            ConfigurationErrorKind::InvalidItem(value_kind(value)),
            path.clone(),
        )),
    }
}

fn build_entry(
    entry: &RawEntry,
    path: &EntryPath,
    ctx: &Context<'_>,
) -> Result<NavigationEntry, ConfigurationError> {
    if let Some(invalid) = entry.invalid.first() {
        return Err(ConfigurationError::new(
            ConfigurationErrorKind::InvalidFieldType {
                field: invalid.field,
                expected: invalid.expected,
            },
            path.clone(),
        ));
    }

    // Objects with an id but no type are document references
    let entry_type = match (entry.entry_type.as_deref(), &entry.id) {
        (Some(t), _) => t,
        (None, Some(_)) => "doc",
        (None, None) => {
            return Err(ConfigurationError::new(
                ConfigurationErrorKind::MissingType,
                path.clone(),
            ));
        }
    };

    match entry_type {
        "doc" => build_doc(entry, path),
        "category" => build_category(entry, path, ctx),
        "link" => build_link(entry, path, ctx),
        "html" => build_html(entry, path),
        other => Err(ConfigurationError::new(
            ConfigurationErrorKind::UnknownType(other.to_owned()),
            path.clone(),
        )),
    }
}

fn build_doc(entry: &RawEntry, path: &EntryPath) -> Result<NavigationEntry, ConfigurationError> {
    check_fields(entry, "doc", DOC_FIELDS, path)?;
    let id = require(entry.id.as_deref(), "doc", "id", path)?;
    validate_doc_id(id, path)?;

    Ok(NavigationEntry::Doc(DocRef {
        id: id.to_owned(),
        label: entry.label.clone(),
        class_name: entry.class_name.clone(),
    }))
}

fn build_category(
    entry: &RawEntry,
    path: &EntryPath,
    ctx: &Context<'_>,
) -> Result<NavigationEntry, ConfigurationError> {
    check_fields(entry, "category", CATEGORY_FIELDS, path)?;
    let label = require(entry.label.as_deref(), "category", "label", path)?;
    let items = entry.items.as_deref().ok_or_else(|| {
        ConfigurationError::new(
            ConfigurationErrorKind::MissingField {
                entry_type: "category",
                field: "items",
            },
            path.clone(),
        )
    })?;
    if items.is_empty() {
        return Err(ConfigurationError::new(
            ConfigurationErrorKind::EmptyCategory(label.to_owned()),
            path.clone(),
        ));
    }

    let collapsible = entry.collapsible.unwrap_or(ctx.defaults.collapsible);
    let collapsed = match entry.collapsed {
        Some(true) if !collapsible => {
            return Err(ConfigurationError::new(
                ConfigurationErrorKind::CollapsedNotCollapsible(label.to_owned()),
                path.clone(),
            ));
        }
        Some(collapsed) => collapsed,
        None => collapsible && ctx.defaults.collapsed,
    };

    let link = entry
        .link
        .as_ref()
        .map(|link| build_category_link(link, label, &path.field("link")))
        .transpose()?;
    let children = build_items(items, &path.field("items"), ctx)?;

    Ok(NavigationEntry::Category(Category {
        label: label.to_owned(),
        children,
        collapsed,
        collapsible,
        link,
        class_name: entry.class_name.clone(),
    }))
}

fn build_category_link(
    link: &RawCategoryLink,
    label: &str,
    path: &EntryPath,
) -> Result<CategoryLink, ConfigurationError> {
    let Some(link_type) = link.link_type.as_deref() else {
        return Err(ConfigurationError::new(
            ConfigurationErrorKind::MissingType,
            path.clone(),
        ));
    };

    let (entry_type, allowed) = match link_type {
        "doc" => ("doc", DOC_LINK_FIELDS),
        "generated-index" => ("generated-index", GENERATED_INDEX_FIELDS),
        other => {
            return Err(ConfigurationError::new(
                ConfigurationErrorKind::UnknownType(other.to_owned()),
                path.clone(),
            ));
        }
    };
    reject_unexpected(
        entry_type,
        link.present_fields(),
        link.extra.keys(),
        allowed,
        path,
    )?;

    if entry_type == "doc" {
        let id = require(link.id.as_deref(), "doc", "id", path)?;
        validate_doc_id(id, path)?;
        return Ok(CategoryLink::Doc { id: id.to_owned() });
    }

    let slug = match link.slug.as_deref() {
        Some(slug) if slug.starts_with('/') => slug.to_owned(),
        Some(slug) => format!("/{slug}"),
        None => format!("/category/{}", slugify(label)),
    };
    Ok(CategoryLink::GeneratedIndex {
        title: link.title.clone(),
        description: link.description.clone(),
        slug,
    })
}

fn build_link(
    entry: &RawEntry,
    path: &EntryPath,
    ctx: &Context<'_>,
) -> Result<NavigationEntry, ConfigurationError> {
    check_fields(entry, "link", LINK_FIELDS, path)?;
    let label = require(entry.label.as_deref(), "link", "label", path)?;
    let href = require(entry.href.as_deref(), "link", "href", path)?;
    let auto_add_base_url = entry.auto_add_base_url.unwrap_or(true);

    let href = if auto_add_base_url {
        apply_base_url(ctx.base_url, href)
    } else {
        href.to_owned()
    };

    Ok(NavigationEntry::Link(Link {
        label: label.to_owned(),
        href,
        auto_add_base_url,
        class_name: entry.class_name.clone(),
    }))
}

fn build_html(entry: &RawEntry, path: &EntryPath) -> Result<NavigationEntry, ConfigurationError> {
    check_fields(entry, "html", HTML_FIELDS, path)?;
    let value = require(entry.value.as_deref(), "html", "value", path)?;

    Ok(NavigationEntry::Html(Html {
        value: value.to_owned(),
        default_style: entry.default_style.unwrap_or(false),
        class_name: entry.class_name.clone(),
    }))
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Prefix a site-relative href with the base URL.
///
/// External destinations (schemes, protocol-relative URLs, relative paths)
/// and hrefs already under the base URL are returned unchanged.
pub(crate) fn apply_base_url(base_url: &str, href: &str) -> String {
    if base_url == "/" || !href.starts_with('/') || href.starts_with("//") {
        return href.to_owned();
    }
    let base_no_slash = base_url.trim_end_matches('/');
    if href == base_no_slash || href.starts_with(base_url) {
        return href.to_owned();
    }
    format!("{base_no_slash}{href}")
}

fn check_fields(
    entry: &RawEntry,
    entry_type: &'static str,
    allowed: &[&str],
    path: &EntryPath,
) -> Result<(), ConfigurationError> {
    reject_unexpected(
        entry_type,
        entry.present_fields(),
        entry.extra.keys(),
        allowed,
        path,
    )
}

fn reject_unexpected<'a>(
    entry_type: &'static str,
    present: Vec<&'static str>,
    mut extra: impl Iterator<Item = &'a String>,
    allowed: &[&str],
    path: &EntryPath,
) -> Result<(), ConfigurationError> {
    let unexpected = present
        .into_iter()
        .find(|field| !allowed.contains(field))
        .map(str::to_owned)
        .or_else(|| extra.next().cloned());

    match unexpected {
        Some(field) => Err(ConfigurationError::new(
            ConfigurationErrorKind::UnexpectedField { entry_type, field },
            path.clone(),
        )),
        None => Ok(()),
    }
}

/// Require a non-empty string field.
fn require<'a>(
    value: Option<&'a str>,
    entry_type: &'static str,
    field: &'static str,
    path: &EntryPath,
) -> Result<&'a str, ConfigurationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigurationError::new(
            ConfigurationErrorKind::MissingField { entry_type, field },
            path.clone(),
        )),
    }
}

/// Check document id syntax. Existence is checked by a content resolver.
fn validate_doc_id(id: &str, path: &EntryPath) -> Result<(), ConfigurationError> {
    let reason = if id.is_empty() {
        Some("empty")
    } else if id.chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if id.starts_with('/') || id.ends_with('/') {
        Some("leading or trailing '/'")
    } else if id
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        Some("contains an empty, '.' or '..' segment")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigurationError::new(
            ConfigurationErrorKind::InvalidDocId {
                id: id.to_owned(),
                reason,
            },
            path.clone(),
        )),
        None => Ok(()),
    }
}

/// Lowercase URL slug: alphanumeric runs joined by `-`.
fn slugify(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
