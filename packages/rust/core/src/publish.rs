//! Per-file publication: copy Markdown, convert schemas, skip everything else.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use schemadoc_markdown::SchemaToText;
use schemadoc_shared::{Result, SchemaDocError, join_uri, page_name};

use crate::discovery::{DiscoveredFile, FileKind};

/// Substrings that mark a JSON file as a schema worth converting.
pub const SCHEMA_MARKERS: [&str; 2] = ["$schema", "$ref"];

/// Where publication reads from and writes to.
#[derive(Debug, Clone, Copy)]
pub struct PublishContext<'a> {
    /// Include paths are relative to this directory.
    pub project_root: &'a Path,
    /// Docs root of the documentation site.
    pub docs_dir: &'a Path,
    /// Output subdirectory under the docs root.
    pub output: &'a str,
}

/// Outcome of publishing one discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationResult {
    /// Written to `src_uri` (relative to the docs root).
    Published { name: String, src_uri: String },
    /// Not a schema; nothing written.
    Warned(String),
    /// Looked like a schema but could not be parsed or converted.
    Failed(String),
}

/// Output path of `file`, relative to the docs root.
pub fn output_uri(file: &DiscoveredFile, output: &str) -> String {
    let name = match file.file_name().strip_suffix(".json") {
        Some(stem) => format!("{stem}.md"),
        None => file.file_name().to_string(),
    };
    join_uri(&join_uri(output, &file.section), &name)
}

/// Publish a single file into the output tree.
///
/// Content problems in schema files come back as `Warned` or `Failed`.
/// Filesystem errors are returned as `Err` and abort the run.
#[instrument(skip_all, fields(path = %file.path))]
pub fn publish(
    file: &DiscoveredFile,
    ctx: &PublishContext<'_>,
    converter: &dyn SchemaToText,
) -> Result<PublicationResult> {
    let source = ctx.project_root.join(&file.path);
    let bytes = std::fs::read(&source).map_err(|e| SchemaDocError::io(&source, e))?;

    let src_uri = output_uri(file, ctx.output);
    let dest = ctx.docs_dir.join(&src_uri);

    let page = match file.kind() {
        FileKind::Markdown => bytes,
        FileKind::Json => {
            let data = match String::from_utf8(bytes) {
                Ok(data) => data,
                Err(e) => {
                    let e = SchemaDocError::conversion(&file.path, format!("not valid UTF-8: {e}"));
                    return Ok(content_failure(file, &e));
                }
            };

            if !SCHEMA_MARKERS.iter().any(|marker| data.contains(marker)) {
                let reason = format!("{} does not seem to be a valid Schema JSON file", file.path);
                warn!(path = %file.path, "no schema marker found, skipping");
                return Ok(PublicationResult::Warned(reason));
            }

            match render_schema_page(&data, &file.path, converter) {
                Ok(page) => page.into_bytes(),
                Err(e) if e.is_content_error() => return Ok(content_failure(file, &e)),
                Err(e) => return Err(e),
            }
        }
    };

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SchemaDocError::io(parent, e))?;
    }
    std::fs::write(&dest, page).map_err(|e| SchemaDocError::io(&dest, e))?;
    debug!(dest = %dest.display(), "wrote page");

    Ok(PublicationResult::Published {
        name: page_name(&src_uri),
        src_uri,
    })
}

fn content_failure(file: &DiscoveredFile, e: &SchemaDocError) -> PublicationResult {
    error!(
        path = %file.path,
        error = %e,
        "exception handling schema; the file may not be valid Schema, consider excluding it"
    );
    PublicationResult::Failed(format!(
        "{}: {e}. The file may not be valid Schema, consider excluding it.",
        file.path
    ))
}

/// Parse `data`, convert it, and prefix the collapsible source block.
pub fn render_schema_page(data: &str, source: &str, converter: &dyn SchemaToText) -> Result<String> {
    let schema: Value =
        serde_json::from_str(data).map_err(|e| SchemaDocError::schema_parse(source, e))?;

    let blocks = converter.parse_schema(&schema, source)?;

    let pretty = serde_json::to_string_pretty(&schema)
        .map_err(|e| SchemaDocError::Serialize(e.to_string()))?;

    let mut page = source_block(&pretty);
    for block in blocks {
        page.push_str(&block);
    }
    Ok(page)
}

/// Collapsible "Source Code" disclosure holding the pretty-printed document.
fn source_block(pretty: &str) -> String {
    let header = [
        "<details><summary>Source Code</summary>",
        "",
        "```json",
        pretty,
        "```",
        "",
        "</details>",
    ];
    // Converted Markdown starts with a heading, which needs its own line.
    format!("{}\n\n", header.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadoc_markdown::MarkdownConverter;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sd-publish-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(root: &Path, rel: &str, content: &str) -> DiscoveredFile {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        DiscoveredFile {
            section: crate::discovery::section_key(rel),
            path: rel.to_string(),
        }
    }

    fn ctx(root: &Path) -> PublishContext<'_> {
        PublishContext {
            project_root: root,
            docs_dir: root,
            output: "schema",
        }
    }

    /// Pulls the fenced JSON back out of the source block.
    fn source_json(page: &str) -> Value {
        let start = page.find("```json\n").unwrap() + "```json\n".len();
        let end = page[start..].find("\n```").unwrap() + start;
        serde_json::from_str(&page[start..end]).unwrap()
    }

    #[test]
    fn output_uri_maps_json_to_md() {
        let file = DiscoveredFile {
            section: "schemas".into(),
            path: "docs/schemas/a.json".into(),
        };
        assert_eq!(output_uri(&file, "schema"), "schema/schemas/a.md");

        let root_file = DiscoveredFile {
            section: String::new(),
            path: "docs/readme.md".into(),
        };
        assert_eq!(output_uri(&root_file, "schema"), "schema/readme.md");
    }

    #[test]
    fn markdown_is_copied_verbatim() {
        let root = temp_dir();
        let content = "# Notes\n\nSome *text* with trailing spaces  \n";
        let file = write(&root, "docs/notes/readme.md", content);

        let result = publish(&file, &ctx(&root), &MarkdownConverter::default()).unwrap();
        assert_eq!(
            result,
            PublicationResult::Published {
                name: "readme".into(),
                src_uri: "schema/notes/readme.md".into()
            }
        );
        let written = std::fs::read(root.join("schema/notes/readme.md")).unwrap();
        assert_eq!(written, content.as_bytes());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn non_utf8_markdown_is_copied_byte_for_byte() {
        let root = temp_dir();
        let bytes = b"# Caf\xe9\n";
        let path = root.join("docs/notes/latin1.md");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, bytes).unwrap();
        let file = DiscoveredFile {
            section: "notes".into(),
            path: "docs/notes/latin1.md".into(),
        };

        let result = publish(&file, &ctx(&root), &MarkdownConverter::default()).unwrap();
        assert!(matches!(result, PublicationResult::Published { ref name, .. } if name == "latin1"));
        assert_eq!(std::fs::read(root.join("schema/notes/latin1.md")).unwrap(), bytes);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn schema_is_converted_with_source_block() {
        let root = temp_dir();
        let raw = r#"{"$schema": "http://json-schema.org/draft-07/schema#", "title": "A", "type": "object"}"#;
        let file = write(&root, "docs/schemas/a.json", raw);

        let result = publish(&file, &ctx(&root), &MarkdownConverter::default()).unwrap();
        assert!(matches!(result, PublicationResult::Published { ref name, .. } if name == "a"));

        let page = std::fs::read_to_string(root.join("schema/schemas/a.md")).unwrap();
        assert!(page.starts_with("<details><summary>Source Code</summary>\n\n```json\n{\n  \"$schema\""));
        assert!(page.contains("```\n\n</details>\n\n# A\n\n"));
        assert_eq!(source_json(&page), serde_json::from_str::<Value>(raw).unwrap());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn json_without_marker_is_warned() {
        let root = temp_dir();
        let file = write(&root, "docs/bad.json", r#"{"foo": "bar"}"#);

        let result = publish(&file, &ctx(&root), &MarkdownConverter::default()).unwrap();
        assert_eq!(
            result,
            PublicationResult::Warned("docs/bad.json does not seem to be a valid Schema JSON file".into())
        );
        assert!(!root.join("schema/bad.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn malformed_schema_fails_without_output() {
        let root = temp_dir();
        let file = write(&root, "docs/broken/x.json", r#"{"$schema": "x", "type": "#);

        let result = publish(&file, &ctx(&root), &MarkdownConverter::default()).unwrap();
        match result {
            PublicationResult::Failed(reason) => {
                assert!(reason.contains("docs/broken/x.json"));
                assert!(reason.contains("consider excluding it"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!root.join("schema/broken/x.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn non_utf8_schema_is_a_failure() {
        let root = temp_dir();
        let path = root.join("docs/s/latin1.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{\"$schema\": \"caf\xe9\"}").unwrap();
        let file = DiscoveredFile {
            section: "s".into(),
            path: "docs/s/latin1.json".into(),
        };

        let result = publish(&file, &ctx(&root), &MarkdownConverter::default()).unwrap();
        assert!(matches!(result, PublicationResult::Failed(ref r) if r.contains("UTF-8")));
        assert!(!root.join("schema/s/latin1.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn converter_rejection_is_a_failure() {
        let root = temp_dir();
        let file = write(&root, "docs/s/ref.json", r##"{"$ref": "#/x", "properties": {"a": 1}}"##);

        let result = publish(&file, &ctx(&root), &MarkdownConverter::default()).unwrap();
        assert!(matches!(result, PublicationResult::Failed(_)));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_source_is_fatal() {
        let root = temp_dir();
        let file = DiscoveredFile {
            section: String::new(),
            path: "docs/missing.json".into(),
        };

        let err = publish(&file, &ctx(&root), &MarkdownConverter::default()).unwrap_err();
        assert!(matches!(err, SchemaDocError::Io { .. }));

        let _ = std::fs::remove_dir_all(&root);
    }
}
