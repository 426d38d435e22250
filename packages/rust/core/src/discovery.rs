//! Include discovery and section partitioning.
//!
//! Turns the configured include list into a map of section key to the files
//! that section publishes. Directories are scanned one level deep.

use std::path::Path;

use tracing::{debug, instrument, warn};

use schemadoc_shared::{Result, SchemaDocError, SectionMap};

/// What a discovered file is published as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Copied verbatim.
    Markdown,
    /// Converted if it looks like a schema.
    Json,
}

/// A file found through an include path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Section the producing include path maps to.
    pub section: String,
    /// Project-root-relative, `/`-separated path.
    pub path: String,
}

impl DiscoveredFile {
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn kind(&self) -> FileKind {
        if self.path.ends_with(".md") {
            FileKind::Markdown
        } else {
            FileKind::Json
        }
    }
}

/// Sections with their files, plus location warnings raised along the way.
#[derive(Debug, Default)]
pub struct Partition {
    pub sections: SectionMap<Vec<DiscoveredFile>>,
    pub warnings: Vec<String>,
}

/// Derive the section key for an include path.
///
/// The first path component is dropped. Markdown file paths use their
/// parent directory, so `docs/notes/readme.md` and `docs/notes` share the
/// `notes` section; `docs/bad.json` keeps its file name as `bad.json`.
pub fn section_key(spec: &str) -> String {
    let spec = spec.trim_end_matches('/');
    let dir = if spec.ends_with(".md") {
        spec.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    } else {
        spec
    };

    dir.split_once('/')
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default()
}

fn is_file_spec(spec: &str) -> bool {
    spec.ends_with(".json") || spec.ends_with(".md")
}

/// Partition include paths into sections.
///
/// Every include creates its section, even when nothing is found.
/// File paths are taken as-is (a missing file surfaces when it is
/// read). Unknown paths produce a warning, never an error. Each section's
/// files are sorted by path and listed once.
#[instrument(skip_all, fields(includes = include.len()))]
pub fn partition(include: &[String], project_root: &Path) -> Result<Partition> {
    let mut out = Partition::default();

    for spec in include {
        let spec = spec.trim_end_matches('/');
        let section = section_key(spec);
        let files = out.sections.entry(section.clone()).or_default();

        if is_file_spec(spec) {
            files.push(DiscoveredFile {
                section,
                path: spec.to_string(),
            });
            continue;
        }

        let full = project_root.join(spec);
        if full.is_dir() {
            let found = scan_dir(&full, spec, &section)?;
            debug!(spec, section = %section, found = found.len(), "scanned include directory");
            files.extend(found);
        } else {
            let message = format!("Could not locate {spec}");
            warn!(spec, "could not locate include");
            out.warnings.push(message);
        }
    }

    for files in out.sections.values_mut() {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup();
    }

    debug!(
        sections = out.sections.len(),
        warnings = out.warnings.len(),
        "partition complete"
    );

    Ok(out)
}

/// List direct `*.json` children, then `*.md` children, each sorted by name.
fn scan_dir(dir: &Path, spec: &str, section: &str) -> Result<Vec<DiscoveredFile>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SchemaDocError::io(dir, e))?;

    let mut json = Vec::new();
    let mut markdown = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| SchemaDocError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        if name.ends_with(".json") {
            json.push(name);
        } else if name.ends_with(".md") {
            markdown.push(name);
        }
    }

    json.sort();
    markdown.sort();

    Ok(json
        .into_iter()
        .chain(markdown)
        .map(|name| DiscoveredFile {
            section: section.to_string(),
            path: format!("{spec}/{name}"),
        })
        .collect())
}
