//! Schema discovery and publication for a static documentation site.
//!
//! Include paths are partitioned into sections, schema documents are turned
//! into Markdown pages under the docs root, and every page is handed to the
//! host's file registry and navigation (see [`pipeline::run`]).

pub mod discovery;
pub mod nav;
pub mod pipeline;
pub mod publish;
pub mod registry;
