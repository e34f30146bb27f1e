//! Raw sidebar entries as authored in a sidebars file.
//!
//! The raw grammar is intentionally permissive: every known field is
//! optional, unknown fields are captured instead of rejected, and values of
//! the wrong type are recorded rather than failing the parse. The builder
//! then reports each violation with the exact entry path. Validation
//! happens in [`crate::builder`].

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single raw sidebar item.
///
/// Either a bare document id (shorthand for `{type: doc, id}`) or an
/// explicit entry object. Anything else is kept as [`RawItem::Invalid`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawItem {
    /// Bare document id.
    Shorthand(String),
    /// Explicit entry object.
    Entry(Box<RawEntry>),
    /// Neither a string nor an object.
    Invalid(Value),
}

impl RawItem {
    /// Bare document reference.
    #[must_use]
    pub fn doc(id: impl Into<String>) -> Self {
        Self::Shorthand(id.into())
    }

    /// Classify a parsed value. Never fails.
    fn from_value(value: Value) -> Self {
        match value {
            Value::String(id) => Self::Shorthand(id),
            Value::Object(object) => Self::Entry(Box::new(RawEntry::from_object(object))),
            other => Self::Invalid(other),
        }
    }
}

impl<'de> Deserialize<'de> for RawItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl From<&str> for RawItem {
    fn from(id: &str) -> Self {
        Self::Shorthand(id.to_owned())
    }
}

impl From<RawEntry> for RawItem {
    fn from(entry: RawEntry) -> Self {
        Self::Entry(Box::new(entry))
    }
}

/// A known field whose value has the wrong type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidField {
    /// Field name as written in the sidebars file.
    pub field: &'static str,
    /// Description of the accepted value.
    pub expected: &'static str,
}

/// Explicit raw entry object.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RawItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<RawCategoryLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_add_base_url: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_style: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Fields outside the grammar, kept for error reporting.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
    /// Known fields that held a value of the wrong type, by key name.
    #[serde(skip)]
    pub invalid: Vec<InvalidField>,
}

impl<'de> Deserialize<'de> for RawEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_object)
    }
}

impl RawEntry {
    /// Sort the keys of an entry object into known fields, unknown fields
    /// and mistyped fields. `null` counts as absent.
    fn from_object(object: Map<String, Value>) -> Self {
        let mut entry = Self::default();
        for (key, value) in object {
            match key.as_str() {
                "type" => entry.entry_type = entry.typed("type", value, "a string"),
                "id" => entry.id = entry.typed("id", value, "a string"),
                "label" => entry.label = entry.typed("label", value, "a string"),
                "items" => entry.items = entry.items_from(value),
                "href" => entry.href = entry.typed("href", value, "a string"),
                "collapsed" => entry.collapsed = entry.typed("collapsed", value, "a boolean"),
                "collapsible" => {
                    entry.collapsible = entry.typed("collapsible", value, "a boolean");
                }
                "link" => entry.link = entry.typed("link", value, "a category link object"),
                "autoAddBaseUrl" => {
                    entry.auto_add_base_url = entry.typed("autoAddBaseUrl", value, "a boolean");
                }
                "value" => entry.value = entry.typed("value", value, "a string"),
                "defaultStyle" => {
                    entry.default_style = entry.typed("defaultStyle", value, "a boolean");
                }
                "className" => entry.class_name = entry.typed("className", value, "a string"),
                _ => {
                    entry.extra.insert(key, value);
                }
            }
        }
        entry
    }

    fn typed<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        value: Value,
        expected: &'static str,
    ) -> Option<T> {
        serde_json::from_value::<Option<T>>(value).unwrap_or_else(|_| {
            self.invalid.push(InvalidField { field, expected });
            None
        })
    }

    fn items_from(&mut self, value: Value) -> Option<Vec<RawItem>> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(items.into_iter().map(RawItem::from_value).collect()),
            _ => {
                self.invalid.push(InvalidField {
                    field: "items",
                    expected: "a list of items",
                });
                None
            }
        }
    }

    /// Explicit document reference.
    #[must_use]
    pub fn doc(id: impl Into<String>) -> Self {
        Self {
            entry_type: Some("doc".to_owned()),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Category with the given children.
    #[must_use]
    pub fn category(label: impl Into<String>, items: Vec<RawItem>) -> Self {
        Self {
            entry_type: Some("category".to_owned()),
            label: Some(label.into()),
            items: Some(items),
            ..Self::default()
        }
    }

    /// Link to an internal or external destination.
    #[must_use]
    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            entry_type: Some("link".to_owned()),
            label: Some(label.into()),
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// Raw HTML block.
    #[must_use]
    pub fn html(value: impl Into<String>) -> Self {
        Self {
            entry_type: Some("html".to_owned()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Set the `collapsed` flag.
    #[must_use]
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    /// Set the `collapsible` flag.
    #[must_use]
    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = Some(collapsible);
        self
    }

    /// Set the `autoAddBaseUrl` flag.
    #[must_use]
    pub fn with_auto_add_base_url(mut self, auto: bool) -> Self {
        self.auto_add_base_url = Some(auto);
        self
    }

    /// Set the category landing link.
    #[must_use]
    pub fn with_link(mut self, link: RawCategoryLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Names of the known fields that are set, in grammar order.
    pub(crate) fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let mut push = |set: bool, name: &'static str| {
            if set {
                fields.push(name);
            }
        };
        push(self.id.is_some(), "id");
        push(self.label.is_some(), "label");
        push(self.items.is_some(), "items");
        push(self.href.is_some(), "href");
        push(self.collapsed.is_some(), "collapsed");
        push(self.collapsible.is_some(), "collapsible");
        push(self.link.is_some(), "link");
        push(self.auto_add_base_url.is_some(), "autoAddBaseUrl");
        push(self.value.is_some(), "value");
        push(self.default_style.is_some(), "defaultStyle");
        push(self.class_name.is_some(), "className");
        fields
    }
}

/// Raw landing link of a category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCategoryLink {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RawCategoryLink {
    /// Landing document link.
    #[must_use]
    pub fn doc(id: impl Into<String>) -> Self {
        Self {
            link_type: Some("doc".to_owned()),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Generated index page link.
    #[must_use]
    pub fn generated_index() -> Self {
        Self {
            link_type: Some("generated-index".to_owned()),
            ..Self::default()
        }
    }

    pub(crate) fn present_fields(&self) -> Vec<&'static str> {
        [
            (self.id.is_some(), "id"),
            (self.title.is_some(), "title"),
            (self.description.is_some(), "description"),
            (self.slug.is_some(), "slug"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

/// Items of one sidebar, in display order.
pub type RawTree = Vec<RawItem>;

/// Raw sidebars keyed by name, in declaration order.
///
/// Duplicate names are kept so the builder can reject them with a
/// proper error instead of silently dropping one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSidebars {
    trees: Vec<(String, RawTree)>,
}

impl RawSidebars {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sidebar.
    pub fn push(&mut self, name: impl Into<String>, tree: RawTree) {
        self.trees.push((name.into(), tree));
    }

    /// Append a sidebar, builder style.
    #[must_use]
    pub fn with_tree(mut self, name: impl Into<String>, tree: RawTree) -> Self {
        self.push(name, tree);
        self
    }

    /// Iterate over `(name, items)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RawItem])> {
        self.trees
            .iter()
            .map(|(name, tree)| (name.as_str(), tree.as_slice()))
    }

    /// Number of declared sidebars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether no sidebar is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl<'de> Deserialize<'de> for RawSidebars {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SidebarsVisitor;

        impl<'de> Visitor<'de> for SidebarsVisitor {
            type Value = RawSidebars;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of sidebar names to item lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut sidebars = RawSidebars::new();
                while let Some((name, tree)) = map.next_entry::<String, RawTree>()? {
                    sidebars.push(name, tree);
                }
                Ok(sidebars)
            }
        }

        deserializer.deserialize_map(SidebarsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shorthand_deserializes_as_string() {
        let item: RawItem = serde_json::from_str(r#""guides/index""#).unwrap();
        assert_eq!(item, RawItem::doc("guides/index"));
    }

    #[test]
    fn test_entry_deserializes_camel_case_fields() {
        let json = r#"{
            "type": "link",
            "label": "Demo Access",
            "href": "https://relock.host",
            "autoAddBaseUrl": false
        }"#;
        let item: RawItem = serde_json::from_str(json).unwrap();

        let RawItem::Entry(entry) = item else {
            panic!("expected entry");
        };
        assert_eq!(entry.entry_type.as_deref(), Some("link"));
        assert_eq!(entry.auto_add_base_url, Some(false));
        assert!(entry.extra.is_empty());
    }

    #[test]
    fn test_mistyped_fields_are_recorded() {
        let yaml = "
type: category
label: Deployment
collapsed: maybe
items: guides/index
";
        let entry: RawEntry = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            entry.invalid,
            vec![
                InvalidField {
                    field: "collapsed",
                    expected: "a boolean"
                },
                InvalidField {
                    field: "items",
                    expected: "a list of items"
                },
            ]
        );
        assert_eq!(entry.collapsed, None);
        assert_eq!(entry.items, None);
        assert_eq!(entry.label.as_deref(), Some("Deployment"));
    }

    #[test]
    fn test_null_field_counts_as_absent() {
        let entry: RawEntry = serde_yaml::from_str("type: doc
id: a
label: ~
").unwrap();
        assert!(entry.invalid.is_empty());
        assert_eq!(entry.label, None);
    }

    #[test]
    fn test_non_string_non_object_item_is_kept() {
        let items: Vec<RawItem> = serde_json::from_str(r#"["a", 42, [1]]"#).unwrap();
        assert_eq!(items[0], RawItem::doc("a"));
        assert_eq!(items[1], RawItem::Invalid(Value::from(42)));
        assert!(matches!(items[2], RawItem::Invalid(Value::Array(_))));
    }

    #[test]
    fn test_unknown_fields_are_captured() {
        let json = r#"{"type": "doc", "id": "a", "sidebar_position": 3}"#;
        let entry: RawEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.extra.len(), 1);
        assert!(entry.extra.contains_key("sidebar_position"));
    }

    #[test]
    fn test_present_fields_lists_set_fields() {
        let entry = RawEntry::category("Guides", vec![RawItem::doc("a")]).with_collapsed(true);
        assert_eq!(entry.present_fields(), vec!["label", "items", "collapsed"]);
    }

    #[test]
    fn test_category_link_present_fields() {
        let link = RawCategoryLink {
            title: Some("All guides".to_owned()),
            ..RawCategoryLink::generated_index()
        };
        assert_eq!(link.present_fields(), vec!["title"]);
    }

    #[test]
    fn test_raw_sidebars_preserve_declaration_order() {
        let yaml = "
zeta:
  - a
alpha:
  - b
mid:
  - c
";
        let sidebars: RawSidebars = serde_yaml::from_str(yaml).unwrap();
        let names: Vec<_> = sidebars.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_raw_sidebars_keep_duplicate_json_keys() {
        let json = r#"{"a": ["x"], "a": ["y"]}"#;
        let sidebars: RawSidebars = serde_json::from_str(json).unwrap();
        assert_eq!(sidebars.len(), 2);
    }

    #[test]
    fn test_nested_category_deserializes() {
        let yaml = "
type: category
label: Examples
items:
  - type: category
    label: Next.js
    items:
      - examples/nextjs/relock-nextjs-minimal
";
        let entry: RawEntry = serde_yaml::from_str(yaml).unwrap();
        let items = entry.items.unwrap();
        assert_eq!(items.len(), 1);
        let RawItem::Entry(inner) = &items[0] else {
            panic!("expected nested entry");
        };
        assert_eq!(inner.label.as_deref(), Some("Next.js"));
    }
}
