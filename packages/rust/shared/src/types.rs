//! Core domain types shared between the pipeline and its hosts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Sections keyed by section key, iterated in lexicographic order.
pub type SectionMap<T> = BTreeMap<String, T>;

// ---------------------------------------------------------------------------
// SiteFile
// ---------------------------------------------------------------------------

/// A generated page as the documentation host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFile {
    /// Path relative to the docs root, always `/`-separated.
    pub src_uri: String,
    /// Display name: the file stem, with `README` mapped to `index`.
    pub name: String,
    /// Output path relative to the site root.
    pub dest_uri: String,
    /// Site-relative URL of the rendered page.
    pub url: String,
    /// Absolute path of the source under the docs root.
    pub abs_src_path: PathBuf,
    /// Absolute path of the rendered output under the site root.
    pub abs_dest_path: PathBuf,
}

impl SiteFile {
    /// Describe `src_uri` (relative to `docs_dir`) for a site built into `site_dir`.
    pub fn new(src_uri: &str, docs_dir: &Path, site_dir: &Path, use_directory_urls: bool) -> Self {
        let (dirname, filename) = split_uri(src_uri);
        let (_, ext) = split_ext(filename);
        let name = page_name(src_uri);

        let dest_uri = if ext == "md" {
            let page = if use_directory_urls && name != "index" {
                format!("{name}/index.html")
            } else {
                format!("{name}.html")
            };
            join_uri(dirname, &page)
        } else {
            src_uri.to_string()
        };

        let url = match dest_uri.rsplit_once('/') {
            _ if !use_directory_urls => dest_uri.clone(),
            Some((dir, "index.html")) => format!("{dir}/"),
            None if dest_uri == "index.html" => "./".to_string(),
            _ => dest_uri.clone(),
        };

        Self {
            src_uri: src_uri.to_string(),
            name,
            abs_src_path: docs_dir.join(src_uri),
            abs_dest_path: site_dir.join(&dest_uri),
            dest_uri,
            url,
        }
    }
}

/// Display name of a page: the file stem, with `README` mapped to `index`.
pub fn page_name(src_uri: &str) -> String {
    let (_, filename) = split_uri(src_uri);
    match split_ext(filename).0 {
        "README" => "index".to_string(),
        stem => stem.to_string(),
    }
}

fn split_uri(uri: &str) -> (&str, &str) {
    uri.rsplit_once('/').unwrap_or(("", uri))
}

fn split_ext(filename: &str) -> (&str, &str) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (filename, ""),
    }
}

/// Join two `/`-separated fragments, skipping whichever side is empty.
pub fn join_uri(dir: &str, name: &str) -> String {
    match (dir.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => dir.to_string(),
        (false, false) => format!("{dir}/{name}"),
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// One published page in the nav: serialized as `{name: path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPage {
    pub name: String,
    pub path: String,
}

impl Serialize for NavPage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.path)?;
        map.end()
    }
}

/// The generated navigation entry appended to the host nav.
///
/// The innermost level maps section keys to their pages; every outer level
/// wraps its child in a one-element list, matching how documentation hosts
/// nest nav sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTree {
    /// `{name: {section: [pages]}}`
    Sections {
        name: String,
        sections: SectionMap<Vec<NavPage>>,
    },
    /// `{name: [child]}`
    Nested { name: String, child: Box<NavTree> },
}

impl NavTree {
    pub fn name(&self) -> &str {
        match self {
            Self::Sections { name, .. } | Self::Nested { name, .. } => name,
        }
    }

    /// The section map at the bottom of the tree.
    pub fn sections(&self) -> &SectionMap<Vec<NavPage>> {
        match self {
            Self::Sections { sections, .. } => sections,
            Self::Nested { child, .. } => child.sections(),
        }
    }
}

/// Serializes `[child]` without allocating a `Vec`.
struct OneElement<'a>(&'a NavTree);

impl Serialize for OneElement<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(1))?;
        seq.serialize_element(self.0)?;
        seq.end()
    }
}

impl Serialize for NavTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Sections { name, sections } => map.serialize_entry(name, sections)?,
            Self::Nested { name, child } => map.serialize_entry(name, &OneElement(child))?,
        }
        map.end()
    }
}
