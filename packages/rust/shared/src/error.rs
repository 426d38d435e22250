//! Error types for schemadoc.
//!
//! Library crates use [`SchemaDocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all schemadoc operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaDocError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file carrying a schema marker is not valid JSON.
    #[error("schema parse error in {path}: {source}")]
    SchemaParse {
        path: String,
        source: serde_json::Error,
    },

    /// The converter rejected a parsed schema document.
    #[error("conversion error in {path}: {message}")]
    Conversion { path: String, message: String },

    /// Serializing an output structure (nav tree, config) failed.
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SchemaDocError>;

impl SchemaDocError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON syntax error for the given source path.
    pub fn schema_parse(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::SchemaParse {
            path: path.into(),
            source,
        }
    }

    /// Create a conversion error for the given source path.
    pub fn conversion(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Conversion {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Whether this error came from untrusted file content rather than the
    /// host environment. Only these are skipped by the pipeline.
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::SchemaParse { .. } | Self::Conversion { .. })
    }
}
