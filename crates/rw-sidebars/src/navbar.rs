//! Navbar items pointing into the sidebar set.
//!
//! A navbar is declared next to the sidebars (in `rw.toml`) and references
//! them by name. [`check_navbar`] verifies every reference once the
//! sidebars are built.

use serde::{Deserialize, Serialize};

use crate::entry::Sidebars;
use crate::error::{NavbarError, NavbarErrorKind, NavbarErrors};
use crate::resolver::ContentResolver;

/// Side of the navbar an item is rendered on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavbarPosition {
    #[default]
    Left,
    Right,
}

/// A single navbar item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NavbarItem {
    /// Opens a sidebar at its first document.
    DocSidebar {
        sidebar_id: String,
        label: Option<String>,
        #[serde(default)]
        position: NavbarPosition,
    },
    /// Opens a single document.
    Doc {
        doc_id: String,
        label: Option<String>,
        #[serde(default)]
        position: NavbarPosition,
    },
    /// Site-relative (`to`) or external (`href`) destination.
    Link {
        label: String,
        to: Option<String>,
        href: Option<String>,
        class_name: Option<String>,
        #[serde(default)]
        position: NavbarPosition,
    },
}

impl NavbarItem {
    /// Display label, if one is set.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::DocSidebar { label, .. } | Self::Doc { label, .. } => label.as_deref(),
            Self::Link { label, .. } => Some(label),
        }
    }

    /// Navbar side.
    #[must_use]
    pub fn position(&self) -> NavbarPosition {
        match self {
            Self::DocSidebar { position, .. }
            | Self::Doc { position, .. }
            | Self::Link { position, .. } => *position,
        }
    }
}

/// Check that every navbar item points at something.
///
/// Sidebar names are checked against `sidebars`. Document ids are checked
/// only when a resolver is given.
///
/// # Errors
///
/// Returns [`NavbarErrors`] listing every broken item, in navbar order.
pub fn check_navbar(
    items: &[NavbarItem],
    sidebars: &Sidebars,
    resolver: Option<&dyn ContentResolver>,
) -> Result<(), NavbarErrors> {
    let errors: Vec<_> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            check_item(item, sidebars, resolver).map(|kind| NavbarError { index, kind })
        })
        .collect();

    tracing::debug!(items = items.len(), errors = errors.len(), "Checked navbar");

    if errors.is_empty() {
        Ok(())
    } else {
        Err(NavbarErrors(errors))
    }
}

fn check_item(
    item: &NavbarItem,
    sidebars: &Sidebars,
    resolver: Option<&dyn ContentResolver>,
) -> Option<NavbarErrorKind> {
    match item {
        NavbarItem::DocSidebar { sidebar_id, .. } => sidebars
            .get(sidebar_id)
            .is_none()
            .then(|| NavbarErrorKind::UnknownSidebar(sidebar_id.clone())),
        NavbarItem::Doc { doc_id, .. } => resolver
            .filter(|resolver| resolver.resolve(doc_id).is_none())
            .map(|_| NavbarErrorKind::UnresolvedDoc(doc_id.clone())),
        NavbarItem::Link {
            label, to, href, ..
        } => {
            let targets = [to, href]
                .into_iter()
                .flatten()
                .filter(|target| !target.is_empty())
                .count();
            (targets != 1 || (to.is_some() && href.is_some()))
                .then(|| NavbarErrorKind::LinkTarget(label.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildOptions, TreeDefaults, build_sidebars};
    use crate::raw::{RawItem, RawSidebars};
    use crate::resolver::MockContentResolver;
    use pretty_assertions::assert_eq;

    fn sidebars() -> Sidebars {
        let raw = RawSidebars::new()
            .with_tree("guidesSidebar", vec![RawItem::doc("guides/index")])
            .with_tree("cloudGatewaySidebar", vec![RawItem::doc("gateway/index")]);
        build_sidebars(&raw, &BuildOptions::new(TreeDefaults::new(true, true))).unwrap()
    }

    fn doc_sidebar(id: &str) -> NavbarItem {
        NavbarItem::DocSidebar {
            sidebar_id: id.to_owned(),
            label: None,
            position: NavbarPosition::Left,
        }
    }

    fn link(to: Option<&str>, href: Option<&str>) -> NavbarItem {
        NavbarItem::Link {
            label: "Changelog".to_owned(),
            to: to.map(str::to_owned),
            href: href.map(str::to_owned),
            class_name: None,
            position: NavbarPosition::Left,
        }
    }

    #[test]
    fn test_known_sidebars_pass() {
        let items = [doc_sidebar("guidesSidebar"), doc_sidebar("cloudGatewaySidebar")];
        assert!(check_navbar(&items, &sidebars(), None).is_ok());
    }

    #[test]
    fn test_undefined_sidebar_is_reported() {
        let items = [
            doc_sidebar("guidesSidebar"),
            doc_sidebar("cloudGatewaySidebar"),
            doc_sidebar("apiSidebar"),
        ];

        let errors = check_navbar(&items, &sidebars(), None).unwrap_err();

        assert_eq!(
            errors.errors(),
            &[NavbarError {
                index: 2,
                kind: NavbarErrorKind::UnknownSidebar("apiSidebar".to_owned()),
            }]
        );
        assert!(errors.to_string().contains("navbar item 2: sidebar 'apiSidebar'"));
    }

    #[test]
    fn test_doc_items_checked_only_with_resolver() {
        let items = [NavbarItem::Doc {
            doc_id: "index".to_owned(),
            label: Some("Docs".to_owned()),
            position: NavbarPosition::Left,
        }];
        let sidebars = sidebars();

        assert!(check_navbar(&items, &sidebars, None).is_ok());

        let empty = MockContentResolver::new();
        let errors = check_navbar(&items, &sidebars, Some(&empty)).unwrap_err();
        assert_eq!(
            errors.errors()[0].kind,
            NavbarErrorKind::UnresolvedDoc("index".to_owned())
        );

        let resolver = MockContentResolver::new().with_doc("index", "Relock");
        assert!(check_navbar(&items, &sidebars, Some(&resolver)).is_ok());
    }

    #[test]
    fn test_link_needs_one_target() {
        let sidebars = sidebars();
        assert!(check_navbar(&[link(Some("/blog"), None)], &sidebars, None).is_ok());
        assert!(check_navbar(&[link(None, Some("https://github.com"))], &sidebars, None).is_ok());

        for broken in [
            link(None, None),
            link(Some(""), None),
            link(Some("/blog"), Some("https://github.com")),
        ] {
            let errors = check_navbar(&[broken], &sidebars, None).unwrap_err();
            assert_eq!(
                errors.errors()[0].kind,
                NavbarErrorKind::LinkTarget("Changelog".to_owned())
            );
        }
    }

    #[test]
    fn test_every_broken_item_is_reported() {
        let items = [
            doc_sidebar("apiSidebar"),
            doc_sidebar("guidesSidebar"),
            link(None, None),
        ];
        let errors = check_navbar(&items, &sidebars(), None).unwrap_err();
        let indices: Vec<_> = errors.errors().iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_item_deserializes_from_toml_style_table() {
        let item: NavbarItem = serde_json::from_value(serde_json::json!({
            "type": "docSidebar",
            "sidebar_id": "guidesSidebar",
            "label": "Guides",
        }))
        .unwrap();
        assert_eq!(item.label(), Some("Guides"));
        assert_eq!(item.position(), NavbarPosition::Left);

        let item: NavbarItem = serde_json::from_value(serde_json::json!({
            "type": "link",
            "label": "GitHub",
            "href": "https://github.com/hooked82/relock-dev-examples",
            "position": "right",
        }))
        .unwrap();
        assert_eq!(item.position(), NavbarPosition::Right);
    }
}
