//! Project configuration for schemadoc.
//!
//! Config lives next to the project as `schemadoc.toml`. The `[plugin]` table
//! mirrors the documentation-host plugin options; `[site]` describes where the
//! host keeps its docs and built site. CLI flags override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaDocError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "schemadoc.toml";

// ---------------------------------------------------------------------------
// Config structs (matching schemadoc.toml)
// ---------------------------------------------------------------------------

/// Top-level project config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Documentation site layout.
    #[serde(default)]
    pub site: SiteConfig,

    /// Schema discovery and publication options.
    #[serde(default)]
    pub plugin: PluginConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Docs root, relative to the config file.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Built site root, relative to the config file.
    #[serde(default = "default_site_dir")]
    pub site_dir: String,

    /// Whether pages are served as `page/` rather than `page.html`.
    #[serde(default = "default_true")]
    pub use_directory_urls: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            site_dir: default_site_dir(),
            use_directory_urls: true,
        }
    }
}

fn default_docs_dir() -> String {
    "docs".into()
}
fn default_site_dir() -> String {
    "site".into()
}

/// `[plugin]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Project-root-relative files or directories to publish.
    #[serde(default)]
    pub include: Vec<String>,

    /// Append the generated tree to the site navigation.
    #[serde(default = "default_true")]
    pub auto_nav: bool,

    /// Output subdirectory under the docs root.
    #[serde(default = "default_output")]
    pub output: String,

    /// Slash-separated navigation path for the generated tree.
    #[serde(default = "default_nav")]
    pub nav: String,

    /// Render schema examples as YAML instead of JSON.
    #[serde(default)]
    pub example_as_yaml: bool,

    /// Which examples to render: "all", "properties" or "object".
    #[serde(default = "default_show_example")]
    pub show_example: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            auto_nav: true,
            output: default_output(),
            nav: default_nav(),
            example_as_yaml: false,
            show_example: default_show_example(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_output() -> String {
    "schema".into()
}
fn default_nav() -> String {
    "Schema".into()
}
fn default_show_example() -> String {
    "all".into()
}

// ---------------------------------------------------------------------------
// Site paths (runtime, resolved against the config location)
// ---------------------------------------------------------------------------

/// Resolved site layout handed to the pipeline.
#[derive(Debug, Clone)]
pub struct SitePaths {
    /// Absolute docs root.
    pub docs_dir: PathBuf,
    /// Absolute built-site root.
    pub site_dir: PathBuf,
    /// URL style for generated pages.
    pub use_directory_urls: bool,
}

impl SitePaths {
    /// Resolve relative `[site]` paths against `base` (usually the directory
    /// holding the config file).
    pub fn resolve(site: &SiteConfig, base: &Path) -> Self {
        Self {
            docs_dir: base.join(&site.docs_dir),
            site_dir: base.join(&site.site_dir),
            use_directory_urls: site.use_directory_urls,
        }
    }

    /// Include paths are relative to the parent of the docs root.
    pub fn project_root(&self) -> PathBuf {
        self.docs_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the project config. Returns defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(path)
}

/// Load the project config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaDocError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SchemaDocError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file at `path`. Refuses to overwrite an existing one.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(SchemaDocError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| SchemaDocError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| SchemaDocError::Serialize(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| SchemaDocError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("docs_dir"));
        assert!(toml_str.contains("show_example"));
    }

    #[test]
    fn plugin_defaults_apply_to_empty_table() {
        let config: AppConfig = toml::from_str("[plugin]\n").expect("parse");
        assert!(config.plugin.include.is_empty());
        assert!(config.plugin.auto_nav);
        assert_eq!(config.plugin.output, "schema");
        assert_eq!(config.plugin.nav, "Schema");
        assert!(!config.plugin.example_as_yaml);
        assert_eq!(config.plugin.show_example, "all");
    }

    #[test]
    fn config_with_includes() {
        let toml_str = r#"
[site]
docs_dir = "documentation"
use_directory_urls = false

[plugin]
include = ["docs/schemas", "docs/extra/one.json"]
nav = "Reference/Schemas"
auto_nav = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.site.docs_dir, "documentation");
        assert_eq!(config.site.site_dir, "site");
        assert!(!config.site.use_directory_urls);
        assert_eq!(config.plugin.include.len(), 2);
        assert_eq!(config.plugin.nav, "Reference/Schemas");
        assert!(!config.plugin.auto_nav);
    }

    #[test]
    fn site_paths_resolve_against_base() {
        let site = SiteConfig::default();
        let paths = SitePaths::resolve(&site, Path::new("/srv/project"));
        assert_eq!(paths.docs_dir, PathBuf::from("/srv/project/docs"));
        assert_eq!(paths.site_dir, PathBuf::from("/srv/project/site"));
        assert_eq!(paths.project_root(), PathBuf::from("/srv/project"));
    }

    #[test]
    fn init_then_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("sd-config-test-{}", uuid::Uuid::now_v7()));
        let path = dir.join(CONFIG_FILE_NAME);

        init_config(&path).expect("init");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded.plugin.nav, "Schema");

        let err = init_config(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("sd-missing-{}.toml", uuid::Uuid::now_v7()));
        let config = load_config(&path).expect("defaults");
        assert_eq!(config.site.docs_dir, "docs");
    }

    #[test]
    fn malformed_config_is_config_error() {
        let path = std::env::temp_dir().join(format!("sd-bad-{}.toml", uuid::Uuid::now_v7()));
        std::fs::write(&path, "[plugin\ninclude = 3").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, SchemaDocError::Config { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
