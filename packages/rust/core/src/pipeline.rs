//! End-to-end publication run: includes → sections → pages → registry + nav.

use std::path::{Component, Path};
use std::time::Instant;

use tracing::{info, instrument};

use schemadoc_markdown::SchemaToText;
use schemadoc_shared::{
    NavPage, NavTree, PluginConfig, Result, SchemaDocError, SectionMap, SiteFile, SitePaths,
};

use crate::discovery;
use crate::nav::{NavShape, Navigation};
use crate::publish::{self, PublicationResult, PublishContext};
use crate::registry::{self, FileRegistry};

/// Result of a publication run.
#[derive(Debug)]
pub struct RunReport {
    /// Files registered with the host, in publication order.
    pub published: Vec<SiteFile>,
    /// Location and content-shape warnings.
    pub warnings: Vec<String>,
    /// Schema files that could not be parsed or converted.
    pub failures: Vec<String>,
    /// The generated nav entry (appended to the host only with `auto_nav`).
    pub nav: NavTree,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each file has been handled.
    fn file_done(&self, path: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_done(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &RunReport) {}
}

/// Run the full publication pipeline.
///
/// 1. Validate the nav path and output directory
/// 2. Wipe and recreate `<docs_dir>/<output>`
/// 3. Partition includes into sections
/// 4. Publish every file, section by section, registering each page
/// 5. Append the nav tree to the host when `auto_nav` is set
#[instrument(skip_all, fields(docs_dir = %site.docs_dir.display(), output = %config.output))]
pub fn run(
    config: &PluginConfig,
    site: &SitePaths,
    converter: &dyn SchemaToText,
    files: &mut dyn FileRegistry,
    nav: &mut dyn Navigation,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let start = Instant::now();

    let shape = NavShape::from_path(&config.nav)?;
    validate_output(&config.output)?;

    let project_root = site.project_root();
    info!(
        docs_dir = %site.docs_dir.display(),
        root_dir = %project_root.display(),
        "starting schema publication"
    );

    // --- Phase 1: Reset output ---
    progress.phase("Cleaning output directory");
    reset_dir(&site.docs_dir.join(&config.output))?;

    // --- Phase 2: Discovery ---
    progress.phase("Discovering files");
    let partition = discovery::partition(&config.include, &project_root)?;
    let mut warnings = partition.warnings;
    let mut failures = Vec::new();
    let mut published = Vec::new();

    // --- Phase 3: Publish ---
    progress.phase("Publishing pages");
    let ctx = PublishContext {
        project_root: &project_root,
        docs_dir: &site.docs_dir,
        output: &config.output,
    };
    let total: usize = partition.sections.values().map(Vec::len).sum();
    let mut current = 0;
    let mut sections: SectionMap<Vec<NavPage>> = SectionMap::new();

    for (section, section_files) in &partition.sections {
        let entries = sections.entry(section.clone()).or_default();

        for file in section_files {
            current += 1;
            match publish::publish(file, &ctx, converter)? {
                PublicationResult::Published { name, src_uri } => {
                    let site_file = SiteFile::new(
                        &src_uri,
                        &site.docs_dir,
                        &site.site_dir,
                        site.use_directory_urls,
                    );
                    info!(name = %site_file.name, src_uri = %site_file.src_uri, "added page to files");
                    registry::register(files, site_file.clone());
                    published.push(site_file);
                    entries.push(NavPage { name, path: src_uri });
                }
                PublicationResult::Warned(reason) => warnings.push(reason),
                PublicationResult::Failed(reason) => failures.push(reason),
            }
            progress.file_done(&file.path, current, total);
        }
    }

    // --- Phase 4: Navigation ---
    let tree = shape.attach(sections);
    if config.auto_nav {
        progress.phase("Updating navigation");
        nav.append(tree.clone());
    }

    let report = RunReport {
        published,
        warnings,
        failures,
        nav: tree,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        published = report.published.len(),
        warnings = report.warnings.len(),
        failures = report.failures.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "schema publication complete"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The output directory is deleted on every run, so it must stay inside the
/// docs root.
fn validate_output(output: &str) -> Result<()> {
    let path = Path::new(output);
    let inside = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    let has_name = path.components().any(|c| matches!(c, Component::Normal(_)));

    if inside && has_name {
        Ok(())
    } else {
        Err(SchemaDocError::config(format!(
            "output \"{output}\" must be a relative directory inside the docs root"
        )))
    }
}

fn reset_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(SchemaDocError::io(dir, e)),
    }
    std::fs::create_dir_all(dir).map_err(|e| SchemaDocError::io(dir, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
