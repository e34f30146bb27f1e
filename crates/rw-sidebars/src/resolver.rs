//! Document reference resolution.
//!
//! The builder only checks id syntax. Whether a referenced document exists
//! is answered by a [`ContentResolver`], typically backed by the docs
//! directory, and checked with [`check_references`] once all sidebars are
//! built.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::entry::Sidebars;
use crate::error::{ReferenceError, ReferenceErrors};

/// Extensions tried, in order, when resolving a document id to a file.
const DOC_EXTENSIONS: &[&str] = &["md", "mdx"];

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

/// A content document a sidebar id resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDoc {
    /// Document id.
    pub id: String,
    /// Document title.
    pub title: String,
    /// URL path of the rendered page.
    pub path: String,
}

/// Maps document ids to content documents.
pub trait ContentResolver {
    /// Resolve a document id, returning `None` if no such document exists.
    fn resolve(&self, id: &str) -> Option<ResolvedDoc>;
}

/// Check every document reference of every sidebar.
///
/// All unresolved references are collected, not just the first, so an
/// author can fix them in one pass.
///
/// # Errors
///
/// Returns [`ReferenceErrors`] listing each unresolved id with its sidebar
/// and entry path, in sidebar order.
pub fn check_references(
    sidebars: &Sidebars,
    resolver: &dyn ContentResolver,
) -> Result<(), ReferenceErrors> {
    let mut errors = Vec::new();

    for tree in sidebars.iter() {
        for (path, id) in tree.doc_references() {
            if resolver.resolve(id).is_none() {
                errors.push(ReferenceError {
                    tree: tree.name().to_owned(),
                    path,
                    id: id.to_owned(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ReferenceErrors(errors))
    }
}

/// Resolves document ids against markdown files in a docs directory.
///
/// An id `guides/index` resolves to the first existing file of
/// `guides/index.md`, `guides/index.mdx`, `guides/index/index.md`,
/// `guides/index/index.mdx`.
#[derive(Clone, Debug)]
pub struct FsContentResolver {
    source_dir: PathBuf,
    route_base_path: String,
}

impl FsContentResolver {
    /// Create a resolver rooted at `source_dir`, serving pages under `route_base_path`.
    #[must_use]
    pub fn new(source_dir: PathBuf, route_base_path: &str) -> Self {
        Self {
            source_dir,
            route_base_path: route_base_path.trim_matches('/').to_owned(),
        }
    }

    fn find_file(&self, id: &str) -> Option<PathBuf> {
        let direct = DOC_EXTENSIONS
            .iter()
            .map(|ext| self.source_dir.join(format!("{id}.{ext}")));
        let nested = DOC_EXTENSIONS
            .iter()
            .map(|ext| self.source_dir.join(id).join(format!("index.{ext}")));
        direct.chain(nested).find(|candidate| candidate.is_file())
    }

    fn url_path(&self, id: &str) -> String {
        let id = if id == "index" {
            ""
        } else {
            id.strip_suffix("/index").unwrap_or(id)
        };
        let joined = [self.route_base_path.as_str(), id]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        format!("/{joined}")
    }
}

impl ContentResolver for FsContentResolver {
    fn resolve(&self, id: &str) -> Option<ResolvedDoc> {
        let file = self.find_file(id)?;
        let title = match std::fs::read_to_string(&file) {
            Ok(content) => extract_title(&content),
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "Cannot read document");
                None
            }
        }
        .unwrap_or_else(|| fallback_title(id));

        Some(ResolvedDoc {
            id: id.to_owned(),
            title,
            path: self.url_path(id),
        })
    }
}

#[derive(Deserialize)]
struct FrontMatter {
    title: Option<String>,
}

/// Title from front matter, then from the first H1 heading.
fn extract_title(content: &str) -> Option<String> {
    let body = match split_front_matter(content) {
        Some((front_matter, body)) => {
            let parsed: Option<FrontMatter> = serde_yaml::from_str(front_matter).ok();
            if let Some(title) = parsed.and_then(|fm| fm.title) {
                return Some(title);
            }
            body
        }
        None => content,
    };

    H1_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
}

/// Split `---` delimited front matter from the body. Accepts LF and CRLF.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Last id segment, used when a document has no title.
fn fallback_title(id: &str) -> String {
    id.rsplit('/').next().unwrap_or(id).to_owned()
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockContentResolver;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::HashMap;

    use super::{ContentResolver, ResolvedDoc};

    /// In-memory resolver for tests.
    #[derive(Debug, Default)]
    pub struct MockContentResolver {
        docs: HashMap<String, String>,
    }

    impl MockContentResolver {
        /// Create an empty resolver.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a document with the given id and title.
        #[must_use]
        pub fn with_doc(mut self, id: impl Into<String>, title: impl Into<String>) -> Self {
            self.docs.insert(id.into(), title.into());
            self
        }
    }

    impl ContentResolver for MockContentResolver {
        fn resolve(&self, id: &str) -> Option<ResolvedDoc> {
            self.docs.get(id).map(|title| ResolvedDoc {
                id: id.to_owned(),
                title: title.clone(),
                path: format!("/{id}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildOptions, TreeDefaults, build_sidebars};
    use crate::raw::{RawCategoryLink, RawEntry, RawItem, RawSidebars};
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn sidebars() -> Sidebars {
        let raw = RawSidebars::new()
            .with_tree(
                "guidesSidebar",
                vec![
                    RawItem::doc("guides/index"),
                    RawEntry::category(
                        "Examples",
                        vec![RawItem::doc("examples/a"), RawItem::doc("examples/b")],
                    )
                    .with_link(RawCategoryLink::doc("examples/index"))
                    .into(),
                ],
            )
            .with_tree("cloudGatewaySidebar", vec![RawItem::doc("gateway/index")]);
        build_sidebars(&raw, &BuildOptions::new(TreeDefaults::new(true, true))).unwrap()
    }

    #[test]
    fn test_check_references_all_resolved() {
        let resolver = MockContentResolver::new()
            .with_doc("guides/index", "Guides")
            .with_doc("examples/index", "Examples")
            .with_doc("examples/a", "A")
            .with_doc("examples/b", "B")
            .with_doc("gateway/index", "Gateway");

        assert!(check_references(&sidebars(), &resolver).is_ok());
    }

    #[test]
    fn test_check_references_reports_every_missing_id() {
        let resolver = MockContentResolver::new()
            .with_doc("guides/index", "Guides")
            .with_doc("examples/a", "A");

        let errors = check_references(&sidebars(), &resolver).unwrap_err();

        let found: Vec<_> = errors
            .errors()
            .iter()
            .map(|e| (e.tree.as_str(), e.path.to_string(), e.id.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("guidesSidebar", "[1].link".to_owned(), "examples/index"),
                ("guidesSidebar", "[1].items[1]".to_owned(), "examples/b"),
                ("cloudGatewaySidebar", "[0]".to_owned(), "gateway/index"),
            ]
        );
    }

    #[test]
    fn test_fs_resolver_finds_md_and_mdx() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "guides/simple.md", "# Simple Integration\n");
        write(dir.path(), "guides/agent.mdx", "# JS Agent\n");
        let resolver = FsContentResolver::new(dir.path().to_path_buf(), "docs");

        let simple = resolver.resolve("guides/simple").unwrap();
        assert_eq!(simple.title, "Simple Integration");
        assert_eq!(simple.path, "/docs/guides/simple");
        assert_eq!(resolver.resolve("guides/agent").unwrap().title, "JS Agent");
        assert!(resolver.resolve("guides/missing").is_none());
    }

    #[test]
    fn test_fs_resolver_index_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.md", "# Home\n");
        write(dir.path(), "gateway/index.md", "# Gateway\n");
        write(dir.path(), "api/index.md", "# API\n");
        let resolver = FsContentResolver::new(dir.path().to_path_buf(), "/docs/");

        assert_eq!(resolver.resolve("index").unwrap().path, "/docs");
        assert_eq!(resolver.resolve("gateway/index").unwrap().path, "/docs/gateway");
        // Directory form: id "api" resolves to api/index.md
        assert_eq!(resolver.resolve("api").unwrap().title, "API");
    }

    #[test]
    fn test_fs_resolver_empty_route_base() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "intro.md", "");
        let resolver = FsContentResolver::new(dir.path().to_path_buf(), "");

        let doc = resolver.resolve("intro").unwrap();
        assert_eq!(doc.path, "/intro");
        assert_eq!(doc.title, "intro");
    }

    #[test]
    fn test_extract_title_prefers_front_matter() {
        let content = "---\ntitle: From Front Matter\nsidebar_position: 2\n---\n# From Heading\n";
        assert_eq!(
            extract_title(content),
            Some("From Front Matter".to_owned())
        );
    }

    #[test]
    fn test_extract_title_falls_back_to_heading() {
        let content = "---\nsidebar_position: 2\n---\n\nIntro text\n\n# Gateway Setup\n";
        assert_eq!(extract_title(content), Some("Gateway Setup".to_owned()));
    }

    #[test]
    fn test_extract_title_crlf_front_matter() {
        let content = "---\r\ntitle: Real Title\r\n---\r\n# Heading\r\n";
        assert_eq!(extract_title(content), Some("Real Title".to_owned()));

        let content = "---\r\nsidebar_position: 1\r\n---\r\n# Heading\r\n";
        assert_eq!(extract_title(content), Some("Heading".to_owned()));
    }

    #[test]
    fn test_extract_title_heading_after_tab() {
        assert_eq!(
            extract_title("#\tTabbed Title\n"),
            Some("Tabbed Title".to_owned())
        );
    }

    #[test]
    fn test_extract_title_empty_front_matter() {
        assert_eq!(
            extract_title("---\n---\n# Gateway\n"),
            Some("Gateway".to_owned())
        );
    }

    #[test]
    fn test_unterminated_front_matter_is_body() {
        assert_eq!(split_front_matter("---\ntitle: x\n# Heading\n"), None);
        assert_eq!(
            extract_title("---\ntitle: x\n# Heading\n"),
            Some("Heading".to_owned())
        );
    }

    #[test]
    fn test_extract_title_ignores_h2() {
        assert_eq!(extract_title("## Not a title\n"), None);
    }

    #[test]
    fn test_fallback_title_uses_last_segment() {
        assert_eq!(fallback_title("concepts/what-is-relock"), "what-is-relock");
        assert_eq!(fallback_title("index"), "index");
    }
}
