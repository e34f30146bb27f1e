//! Normalized navigation model.
//!
//! Produced by [`crate::builder`] and consumed read-only by the rendering
//! layer. Every shorthand has been expanded and every default made explicit.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::EntryPath;

/// A node in a navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NavigationEntry {
    /// Reference to a content document.
    Doc(DocRef),
    /// Group of child entries.
    Category(Category),
    /// Internal or external link.
    Link(Link),
    /// Raw HTML block.
    Html(Html),
}

impl NavigationEntry {
    /// Kind name as used in sidebars files.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Doc(_) => "doc",
            Self::Category(_) => "category",
            Self::Link(_) => "link",
            Self::Html(_) => "html",
        }
    }

    /// Display label, if the entry carries one.
    ///
    /// Document references without an explicit label return `None`; their
    /// label comes from the document title at render time.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Doc(doc) => doc.label.as_deref(),
            Self::Category(category) => Some(&category.label),
            Self::Link(link) => Some(&link.label),
            Self::Html(_) => None,
        }
    }
}

/// Reference to a content document by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocRef {
    /// Document id (path without extension, e.g. `guides/index`).
    pub id: String,
    /// Label overriding the document title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Extra CSS class for the rendered item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Group of child entries, optionally linked to a landing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Display label.
    pub label: String,
    /// Child entries in display order. Never empty.
    #[serde(rename = "items")]
    pub children: Vec<NavigationEntry>,
    /// Whether the category starts collapsed.
    pub collapsed: bool,
    /// Whether the category can be collapsed at all.
    pub collapsible: bool,
    /// Page the category itself resolves to when clicked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<CategoryLink>,
    /// Extra CSS class for the rendered item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Landing page of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CategoryLink {
    /// Existing document used as landing page.
    Doc {
        /// Document id.
        id: String,
    },
    /// Index page generated from the category children.
    GeneratedIndex {
        /// Page title (defaults to the category label at render time).
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Page description.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// URL path of the generated page, always starting with `/`.
        slug: String,
    },
}

/// Link to an internal or external destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Display label.
    pub label: String,
    /// Final destination, with the base URL already applied when requested.
    pub href: String,
    /// Whether the base URL prefix applies to site-relative hrefs.
    pub auto_add_base_url: bool,
    /// Extra CSS class for the rendered item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Raw HTML rendered as a sidebar item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Html {
    pub value: String,
    pub default_style: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// A named, validated sidebar.
///
/// Immutable once built; rebuilt wholesale on any configuration change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationTree {
    name: String,
    entries: Vec<NavigationEntry>,
}

impl NavigationTree {
    pub(crate) fn new(name: String, entries: Vec<NavigationEntry>) -> Self {
        Self { name, entries }
    }

    /// Sidebar name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    /// Every document reference with its path, depth-first.
    ///
    /// Includes category landing documents, which are reported at the
    /// category's `link` path.
    #[must_use]
    pub fn doc_references(&self) -> Vec<(EntryPath, &str)> {
        let mut refs = Vec::new();
        collect_doc_refs(&self.entries, &EntryPath::root(), &mut refs);
        refs
    }

    /// Every referenced document id, depth-first.
    #[must_use]
    pub fn doc_ids(&self) -> Vec<&str> {
        self.doc_references()
            .into_iter()
            .map(|(_, id)| id)
            .collect()
    }

    /// First document in display order, used as the sidebar's landing page.
    #[must_use]
    pub fn first_doc_id(&self) -> Option<&str> {
        self.doc_references().first().map(|(_, id)| *id)
    }
}

fn collect_doc_refs<'a>(
    entries: &'a [NavigationEntry],
    parent: &EntryPath,
    refs: &mut Vec<(EntryPath, &'a str)>,
) {
    for (idx, entry) in entries.iter().enumerate() {
        let path = parent.index(idx);
        match entry {
            NavigationEntry::Doc(doc) => refs.push((path, doc.id.as_str())),
            NavigationEntry::Category(category) => {
                if let Some(CategoryLink::Doc { id }) = &category.link {
                    refs.push((path.field("link"), id.as_str()));
                }
                collect_doc_refs(&category.children, &path.field("items"), refs);
            }
            NavigationEntry::Link(_) | NavigationEntry::Html(_) => {}
        }
    }
}

/// All sidebars of a site, in registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sidebars {
    trees: IndexMap<String, NavigationTree>,
}

impl Sidebars {
    pub(crate) fn new(trees: IndexMap<String, NavigationTree>) -> Self {
        Self { trees }
    }

    /// Look up a sidebar by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NavigationTree> {
        self.trees.get(name)
    }

    /// Sidebar names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    /// Sidebars in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationTree> {
        self.trees.values()
    }

    /// Number of sidebars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether there are no sidebars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
