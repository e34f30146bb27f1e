//! Configuration management for RW.
//!
//! Parses `rw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_url`
//! - `docs.source_dir`
//! - `sidebars.path`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rw_sidebars::{BuildOptions, NavbarItem, TreeDefaults};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override sidebars file.
    pub sidebars_path: Option<PathBuf>,
    /// Override site base URL.
    pub base_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Site configuration.
    pub site: SiteConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Sidebar configuration (paths are relative strings from TOML).
    sidebars: SidebarsConfigRaw,
    /// Navbar items referencing sidebars and documents.
    pub navbar: NavbarConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved sidebars configuration (set after loading).
    #[serde(skip)]
    pub sidebars_resolved: SidebarsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Base URL the site is served under, prefixed to site-relative links.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_owned(),
        }
    }
}

/// Navbar configuration.
///
/// ```toml
/// [[navbar.items]]
/// type = "docSidebar"
/// sidebar_id = "guidesSidebar"
/// label = "Guides"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavbarConfig {
    /// Items in display order.
    pub items: Vec<NavbarItem>,
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    route_base_path: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// URL path prefix of documentation pages (without slashes).
    pub route_base_path: String,
}

/// Category policy as written in TOML.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PolicyRaw {
    collapsed: Option<bool>,
    collapsible: Option<bool>,
}

/// Raw sidebars configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct SidebarsConfigRaw {
    path: Option<String>,
    collapsed: Option<bool>,
    collapsible: Option<bool>,
    trees: BTreeMap<String, PolicyRaw>,
}

/// Resolved sidebars configuration.
#[derive(Debug)]
pub struct SidebarsConfig {
    /// Sidebars file (YAML or JSON).
    pub path: PathBuf,
    /// Category policy for sidebars without an override.
    pub defaults: TreeDefaults,
    /// Per-sidebar category policy overrides.
    pub tree_defaults: BTreeMap<String, TreeDefaults>,
}

impl Default for SidebarsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sidebars.yaml"),
            defaults: DEFAULT_POLICY,
            tree_defaults: BTreeMap::new(),
        }
    }
}

/// Categories start collapsed and can be toggled unless configured otherwise.
const DEFAULT_POLICY: TreeDefaults = TreeDefaults::new(true, true);

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// A referenced environment variable is unset and has no default.
    #[error("{field}: environment variable '{var}' is not set")]
    EnvVar {
        /// Config field path (e.g., "`site.base_url`").
        field: &'static str,
        /// Name of the unset variable.
        var: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(sidebars_path) = &settings.sidebars_path {
            self.sidebars_resolved.path.clone_from(sidebars_path);
        }
        if let Some(base_url) = &settings.base_url {
            self.site.base_url.clone_from(base_url);
        }
    }

    /// Sidebar build options derived from the site and sidebars sections.
    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        self.sidebars_resolved.tree_defaults.iter().fold(
            BuildOptions::new(self.sidebars_resolved.defaults).with_base_url(&self.site.base_url),
            |options, (tree, defaults)| options.with_tree_defaults(tree.clone(), *defaults),
        )
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            docs: DocsConfigRaw::default(),
            sidebars: SidebarsConfigRaw::default(),
            navbar: NavbarConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                route_base_path: "docs".to_owned(),
            },
            sidebars_resolved: SidebarsConfig {
                path: base.join("sidebars.yaml"),
                ..SidebarsConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_sidebars()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        let base_url = &self.site.base_url;
        require_non_empty(base_url, "site.base_url")?;
        if !base_url.starts_with('/') || !base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must start and end with '/'".to_owned(),
            ));
        }
        if base_url.contains("//") {
            return Err(ConfigError::Validation(
                "site.base_url cannot contain '//'".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_sidebars(&self) -> Result<(), ConfigError> {
        for name in self.sidebars_resolved.tree_defaults.keys() {
            require_non_empty(name, "sidebars.trees key")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;

        expand::expand_opt(&mut self.docs.source_dir, "docs.source_dir")?;
        expand::expand_opt(&mut self.sidebars.path, "sidebars.path")?;

        Ok(())
    }

    /// Resolve relative paths against the config directory and fill in
    /// category policies.
    fn resolve(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            route_base_path: self
                .docs
                .route_base_path
                .as_deref()
                .unwrap_or("docs")
                .trim_matches('/')
                .to_owned(),
        };

        let defaults = TreeDefaults::new(
            self.sidebars.collapsed.unwrap_or(DEFAULT_POLICY.collapsed),
            self.sidebars.collapsible.unwrap_or(DEFAULT_POLICY.collapsible),
        );
        // Per-tree overrides fall back field by field to the sidebars section
        let tree_defaults = self
            .sidebars
            .trees
            .iter()
            .map(|(name, policy)| {
                let resolved = TreeDefaults::new(
                    policy.collapsed.unwrap_or(defaults.collapsed),
                    policy.collapsible.unwrap_or(defaults.collapsible),
                );
                (name.clone(), resolved)
            })
            .collect();

        self.sidebars_resolved = SidebarsConfig {
            path: resolve(self.sidebars.path.as_deref(), "sidebars.yaml"),
            defaults,
            tree_defaults,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str, dir: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new(dir));
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.route_base_path, "docs");
        assert_eq!(
            config.sidebars_resolved.path,
            PathBuf::from("/test/sidebars.yaml")
        );
        assert_eq!(config.sidebars_resolved.defaults, TreeDefaults::new(true, true));
        assert!(config.sidebars_resolved.tree_defaults.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("", "/project");
        assert_eq!(config.site.base_url, "/");
        assert_eq!(
            config.sidebars_resolved.path,
            PathBuf::from("/project/sidebars.yaml")
        );
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
base_url = "/relock/"

[docs]
source_dir = "content"
route_base_path = "/guides/"

[sidebars]
path = "nav/sidebars.json"
collapsed = true

[sidebars.trees.guidesSidebar]
collapsed = false

[sidebars.trees.apiSidebar]
collapsible = false
"#;
        let config = parse(toml, "/project");

        assert_eq!(config.site.base_url, "/relock/");
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(config.docs_resolved.route_base_path, "guides");
        assert_eq!(
            config.sidebars_resolved.path,
            PathBuf::from("/project/nav/sidebars.json")
        );
        assert_eq!(
            config.sidebars_resolved.tree_defaults.get("guidesSidebar"),
            Some(&TreeDefaults::new(false, true))
        );
        assert_eq!(
            config.sidebars_resolved.tree_defaults.get("apiSidebar"),
            Some(&TreeDefaults::new(true, false))
        );
    }

    #[test]
    fn test_parse_navbar_items() {
        let toml = r#"
[[navbar.items]]
type = "doc"
doc_id = "index"
label = "Docs"

[[navbar.items]]
type = "docSidebar"
sidebar_id = "apiSidebar"
label = "API"

[[navbar.items]]
type = "link"
label = "GitHub"
href = "https://github.com/hooked82/relock-dev-examples"
position = "right"
"#;
        let config = parse(toml, "/project");

        let items = &config.navbar.items;
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[1],
            NavbarItem::DocSidebar {
                sidebar_id: "apiSidebar".to_owned(),
                label: Some("API".to_owned()),
                position: rw_sidebars::NavbarPosition::Left,
            }
        );
        assert_eq!(items[2].position(), rw_sidebars::NavbarPosition::Right);
    }

    #[test]
    fn test_navbar_item_unknown_type_is_rejected() {
        let result: Result<Config, _> =
            toml::from_str("[[navbar.items]]\ntype = \"dropdown\"\nlabel = \"More\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[sidebars]\ncolapsed = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_build_options_apply_policies_and_base_url() {
        let toml = r#"
[site]
base_url = "/relock/"

[sidebars]
collapsed = true

[sidebars.trees.guidesSidebar]
collapsed = false
"#;
        let config = parse(toml, "/project");
        let options = config.build_options();

        assert_eq!(options.base_url(), "/relock/");
        assert_eq!(
            options.defaults_for("guidesSidebar"),
            TreeDefaults::new(false, true)
        );
        assert_eq!(
            options.defaults_for("cloudGatewaySidebar"),
            TreeDefaults::new(true, true)
        );
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            base_url: Some("/preview/".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(config.site.base_url, "/preview/");
        // Unchanged
        assert_eq!(
            config.sidebars_resolved.path,
            PathBuf::from("/test/sidebars.yaml")
        );
    }

    #[test]
    fn test_apply_cli_settings_sidebars_path() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            sidebars_path: Some(PathBuf::from("/elsewhere/sidebars.json")),
            ..Default::default()
        });
        assert_eq!(
            config.sidebars_resolved.path,
            PathBuf::from("/elsewhere/sidebars.json")
        );
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RW_CONFIG_TEST_BASE", "/from-env/");
            std::env::set_var("RW_CONFIG_TEST_SIDEBARS", "nav.yaml");
        }

        let toml = r#"
[site]
base_url = "${RW_CONFIG_TEST_BASE}"

[sidebars]
path = "${RW_CONFIG_TEST_SIDEBARS}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(config.site.base_url, "/from-env/");
        assert_eq!(
            config.sidebars_resolved.path,
            PathBuf::from("/project/nav.yaml")
        );

        unsafe {
            std::env::remove_var("RW_CONFIG_TEST_BASE");
            std::env::remove_var("RW_CONFIG_TEST_SIDEBARS");
        }
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rw.toml");
        std::fs::write(&path, "[docs]\nsource_dir = \"content\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("content"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/rw.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    // Validation tests

    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_base_url_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.base_url = String::new();
        assert_validation_error(&config, &["site.base_url", "empty"]);
    }

    #[test]
    fn test_validate_base_url_slashes() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.base_url = "relock".to_owned();
        assert_validation_error(&config, &["site.base_url", "'/'"]);

        config.site.base_url = "/relock".to_owned();
        assert_validation_error(&config, &["site.base_url"]);

        config.site.base_url = "/a//b/".to_owned();
        assert_validation_error(&config, &["'//'"]);
    }

    #[test]
    fn test_cli_base_url_is_validated() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rw.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            base_url: Some("no-slashes".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
