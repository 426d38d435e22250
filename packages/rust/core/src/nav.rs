//! Navigation tree builder.
//!
//! A slash-separated nav path such as `Reference/Schemas` becomes a chain of
//! nested nav levels; the published sections hang off the innermost one.

use tracing::{debug, instrument};

use schemadoc_shared::{NavPage, NavTree, Result, SchemaDocError, SectionMap};

/// Shape of the generated nav entry before the sections are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavShape {
    /// Innermost level: holds the section map.
    Leaf(String),
    /// Outer level wrapping a single child.
    Node(String, Box<NavShape>),
}

impl NavShape {
    /// Build the shape from a nav path.
    ///
    /// Empty segments are ignored; a path with no segments at all is a
    /// config error.
    pub fn from_path(nav: &str) -> Result<Self> {
        let mut segments = nav.split('/').filter(|s| !s.is_empty()).rev();

        let innermost = segments.next().ok_or_else(|| {
            SchemaDocError::config(format!("nav path \"{nav}\" has no segments"))
        })?;

        Ok(segments.fold(Self::Leaf(innermost.to_string()), |child, segment| {
            Self::Node(segment.to_string(), Box::new(child))
        }))
    }

    /// Number of nesting levels.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Node(_, child) => 1 + child.depth(),
        }
    }

    /// Fill the innermost level with `sections`.
    #[instrument(skip_all, fields(sections = sections.len()))]
    pub fn attach(&self, sections: SectionMap<Vec<NavPage>>) -> NavTree {
        let tree = self.fill(sections);
        debug!(root = tree.name(), depth = self.depth(), "nav tree built");
        tree
    }

    fn fill(&self, sections: SectionMap<Vec<NavPage>>) -> NavTree {
        match self {
            Self::Leaf(name) => NavTree::Sections {
                name: name.clone(),
                sections,
            },
            Self::Node(name, child) => NavTree::Nested {
                name: name.clone(),
                child: Box::new(child.fill(sections)),
            },
        }
    }
}

/// The documentation host's navigation config.
pub trait Navigation {
    /// Append a top-level entry.
    fn append(&mut self, entry: NavTree);
}

impl Navigation for Vec<NavTree> {
    fn append(&mut self, entry: NavTree) {
        self.push(entry);
    }
}
