//! Shared types, error model, and configuration for schemadoc.
//!
//! This crate is the foundation depended on by all other schemadoc crates.
//! It provides:
//! - [`SchemaDocError`]: the unified error type
//! - Domain types ([`SiteFile`], [`NavTree`], [`NavPage`], [`SectionMap`])
//! - Configuration ([`AppConfig`], [`PluginConfig`], [`SitePaths`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, PluginConfig, SiteConfig, SitePaths, init_config, load_config,
    load_config_from,
};
pub use error::{Result, SchemaDocError};
pub use types::{NavPage, NavTree, SectionMap, SiteFile, join_uri, page_name};
