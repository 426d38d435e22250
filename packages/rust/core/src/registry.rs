//! Host file registry seam and an in-memory implementation.

use tracing::debug;

use schemadoc_shared::SiteFile;

/// The documentation host's collection of site files.
pub trait FileRegistry {
    /// Whether a file with this docs-relative path is registered.
    fn contains(&self, src_uri: &str) -> bool;
    /// Drop the file with this path, returning it if present.
    fn remove(&mut self, src_uri: &str) -> Option<SiteFile>;
    /// Add a file.
    fn append(&mut self, file: SiteFile);
}

/// Register `file`, replacing any file already registered at the same path.
pub fn register(registry: &mut dyn FileRegistry, file: SiteFile) {
    if registry.contains(&file.src_uri) {
        debug!(src_uri = %file.src_uri, "replacing registered file");
        registry.remove(&file.src_uri);
    }
    registry.append(file);
}

/// Ordered in-memory file registry.
#[derive(Debug, Clone, Default)]
pub struct Files {
    files: Vec<SiteFile>,
}

impl Files {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, src_uri: &str) -> Option<&SiteFile> {
        self.files.iter().find(|f| f.src_uri == src_uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileRegistry for Files {
    fn contains(&self, src_uri: &str) -> bool {
        self.get(src_uri).is_some()
    }

    fn remove(&mut self, src_uri: &str) -> Option<SiteFile> {
        let index = self.files.iter().position(|f| f.src_uri == src_uri)?;
        Some(self.files.remove(index))
    }

    fn append(&mut self, file: SiteFile) {
        self.files.push(file);
    }
}
