//! JSON Schema to Markdown conversion.
//!
//! [`SchemaToText`] is the seam the publication pipeline calls through;
//! [`MarkdownConverter`] is the built-in implementation. It renders a schema
//! document as a title, a description, and nested bullet lists for items,
//! properties and definitions, with optional example blocks.

mod examples;

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use schemadoc_shared::{PluginConfig, Result, SchemaDocError};

/// Spaces per nesting level in bullet lists.
const TAB_SIZE: usize = 2;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Converts a parsed schema document into ordered Markdown text blocks.
pub trait SchemaToText {
    /// Blocks are written back to back; each carries its own line breaks.
    /// `source` names the originating file for diagnostics.
    fn parse_schema(&self, schema: &Value, source: &str) -> Result<Vec<String>>;
}

/// Which example blocks to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowExamples {
    /// Root-level and property-level examples.
    #[default]
    All,
    /// Property-level examples only.
    Properties,
    /// Root-level examples only.
    Object,
}

impl ShowExamples {
    fn properties(self) -> bool {
        matches!(self, Self::All | Self::Properties)
    }

    fn object(self) -> bool {
        matches!(self, Self::All | Self::Object)
    }
}

impl FromStr for ShowExamples {
    type Err = SchemaDocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "properties" => Ok(Self::Properties),
            "object" => Ok(Self::Object),
            other => Err(SchemaDocError::config(format!(
                "show_example must be one of \"all\", \"properties\", \"object\"; got \"{other}\""
            ))),
        }
    }
}

/// Options for the built-in converter.
#[derive(Debug, Clone, Default)]
pub struct ConverterOptions {
    /// Render examples as YAML instead of JSON.
    pub examples_as_yaml: bool,
    /// Which examples to render.
    pub show_examples: ShowExamples,
}

impl ConverterOptions {
    /// Build options from the plugin config, rejecting unknown `show_example` values.
    pub fn from_plugin(config: &PluginConfig) -> Result<Self> {
        Ok(Self {
            examples_as_yaml: config.example_as_yaml,
            show_examples: config.show_example.parse()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Built-in JSON Schema to Markdown converter.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    options: ConverterOptions,
}

impl MarkdownConverter {
    pub fn new(options: ConverterOptions) -> Self {
        Self { options }
    }
}

impl SchemaToText for MarkdownConverter {
    #[instrument(skip(self, schema))]
    fn parse_schema(&self, schema: &Value, source: &str) -> Result<Vec<String>> {
        let root = as_object(schema, source, "schema root")?;
        let renderer = Renderer {
            options: &self.options,
            source,
        };

        let lines = renderer.render_root(root)?;
        debug!(blocks = lines.len(), "schema converted");
        Ok(lines)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// A subschema bullet: the name shown and how it is formatted.
struct Bullet<'a> {
    name: Option<&'a str>,
    monospace: bool,
    required: bool,
    anchor: Option<String>,
}

impl<'a> Bullet<'a> {
    fn named(name: &'a str) -> Self {
        Self {
            name: Some(name),
            monospace: true,
            required: false,
            anchor: None,
        }
    }

    fn label(name: &'a str) -> Self {
        Self {
            monospace: false,
            ..Self::named(name)
        }
    }

    fn unnamed() -> Self {
        Self {
            name: None,
            monospace: true,
            required: false,
            anchor: None,
        }
    }
}

struct Renderer<'a> {
    options: &'a ConverterOptions,
    source: &'a str,
}

impl Renderer<'_> {
    fn render_root(&self, root: &Map<String, Value>) -> Result<Vec<String>> {
        let mut out = Vec::new();

        match root.get("title").and_then(Value::as_str) {
            Some(title) => out.push(format!("# {title}\n\n")),
            None => out.push("# JSON Schema\n\n".to_string()),
        }

        if let Some(description) = root.get("description").and_then(Value::as_str) {
            out.push(format!("*{description}*\n\n"));
        }

        if let Some(items) = root.get("items") {
            out.push("## Items\n\n".to_string());
            self.render_object(items, Bullet::label("Items"), 0, &mut out)?;
        }

        if let Some(additional @ Value::Object(_)) = root.get("additionalProperties") {
            out.push("## Additional Properties\n\n".to_string());
            self.render_object(additional, Bullet::label("Additional Properties"), 0, &mut out)?;
        }

        if let Some(patterns) = root.get("patternProperties") {
            out.push("## Pattern Properties\n\n".to_string());
            for (name, child) in as_object(patterns, self.source, "patternProperties")? {
                self.render_object(child, Bullet::named(name), 0, &mut out)?;
            }
        }

        if let Some(properties) = root.get("properties") {
            out.push("## Properties\n\n".to_string());
            let required = required_names(root);
            for (name, child) in as_object(properties, self.source, "properties")? {
                let bullet = Bullet {
                    required: required.contains(&name.as_str()),
                    ..Bullet::named(name)
                };
                self.render_object(child, bullet, 0, &mut out)?;
            }
        }

        for keyword in ["definitions", "$defs"] {
            if let Some(defs) = root.get(keyword) {
                out.push("## Definitions\n\n".to_string());
                for (name, child) in as_object(defs, self.source, keyword)? {
                    let bullet = Bullet {
                        anchor: Some(format!("{keyword}/{name}")),
                        ..Bullet::named(name)
                    };
                    self.render_object(child, bullet, 0, &mut out)?;
                }
            }
        }

        if self.options.show_examples.object() {
            if let Some(examples) = root.get("examples") {
                out.push("## Examples\n\n".to_string());
                let examples = as_array(examples, self.source, "examples")?;
                out.extend(examples::render(
                    examples,
                    "  ",
                    self.options.examples_as_yaml,
                    false,
                    self.source,
                )?);
            }
        }

        Ok(out)
    }

    fn render_object(
        &self,
        value: &Value,
        bullet: Bullet<'_>,
        level: usize,
        out: &mut Vec<String>,
    ) -> Result<()> {
        let context = bullet.name.unwrap_or("subschema");
        let obj = as_object(value, self.source, context)?;

        let indentation = " ".repeat(TAB_SIZE * level);
        let indentation_items = " ".repeat(TAB_SIZE * (level + 1));

        let description = describe(obj)
            .into_iter()
            .map(|part| part.replace("\n\n", &format!("<br>{indentation_items}")))
            .collect::<Vec<_>>()
            .join(" ");

        let format = obj
            .get("format")
            .map(|f| format!(", format: {}", display_value(f)))
            .unwrap_or_default();
        let type_name = obj.get("type").map(display_value);

        let (name, obj_type) = match bullet.name {
            None => (
                String::new(),
                type_name.map(|t| format!("*{t}{format}*")).unwrap_or_default(),
            ),
            Some(name) => {
                let required = if bullet.required { ", required" } else { "" };
                let name = if bullet.monospace {
                    format!("**`{name}`**")
                } else {
                    format!("**{name}**")
                };
                let obj_type = type_name
                    .map(|t| format!(" *({t}{format}{required})*"))
                    .unwrap_or_default();
                (name, obj_type)
            }
        };

        let anchor = bullet
            .anchor
            .map(|id| format!("<a id=\"{id}\"></a>"))
            .unwrap_or_default();

        out.push(format!(
            "{indentation}- {anchor}{name}{obj_type}{description}\n"
        ));

        for (keyword, label) in [("allOf", "All of"), ("anyOf", "Any of"), ("oneOf", "One of")] {
            if let Some(children) = obj.get(keyword) {
                out.push(format!("{indentation_items}- **{label}**\n"));
                for child in as_array(children, self.source, keyword)? {
                    self.render_object(child, Bullet::unnamed(), level + 2, out)?;
                }
            }
        }

        for (keyword, label) in [("items", "Items"), ("definitions", "Definitions"), ("$defs", "$defs")] {
            if let Some(child) = obj.get(keyword) {
                self.render_object(child, Bullet::label(label), level + 1, out)?;
            }
        }

        if let Some(additional @ Value::Object(_)) = obj.get("additionalProperties") {
            self.render_object(additional, Bullet::label("Additional properties"), level + 1, out)?;
        }

        let required = required_names(obj);
        for keyword in ["properties", "patternProperties"] {
            if let Some(children) = obj.get(keyword) {
                for (name, child) in as_object(children, self.source, keyword)? {
                    let bullet = Bullet {
                        required: required.contains(&name.as_str()),
                        ..Bullet::named(name)
                    };
                    self.render_object(child, bullet, level + 1, out)?;
                }
            }
        }

        if self.options.show_examples.properties() {
            if let Some(examples) = obj.get("examples") {
                let examples = as_array(examples, self.source, "examples")?;
                out.extend(examples::render(
                    examples,
                    &indentation_items,
                    self.options.examples_as_yaml,
                    true,
                    self.source,
                )?);
            }
        }

        Ok(())
    }
}

/// Build the sentence list following a bullet's name and type.
///
/// Returns an empty list when there is nothing to say; otherwise the first
/// element is the `:` separator.
fn describe(obj: &Map<String, Value>) -> Vec<String> {
    static SENTENCE_END_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[.?!;]$").expect("valid regex"));

    let mut parts = Vec::new();

    if let Some(description) = obj.get("description").and_then(Value::as_str) {
        let ending = if SENTENCE_END_RE.is_match(description) { "" } else { "." };
        parts.push(format!("{description}{ending}"));
    }

    for (keyword, label) in [
        ("minimum", "Minimum"),
        ("exclusiveMinimum", "Exclusive minimum"),
        ("maximum", "Maximum"),
        ("exclusiveMaximum", "Exclusive maximum"),
    ] {
        if let Some(bound) = obj.get(keyword) {
            parts.push(format!("{label}: `{}`.", display_value(bound)));
        }
    }

    for (min_key, max_key) in [("minItems", "maxItems"), ("minLength", "maxLength")] {
        match (obj.get(min_key), obj.get(max_key)) {
            (Some(min), Some(max)) => parts.push(format!(
                "Length must be between {} and {} (inclusive).",
                display_value(min),
                display_value(max)
            )),
            (Some(min), None) => parts.push(format!("Length must be at least {}.", display_value(min))),
            (None, Some(max)) => parts.push(format!("Length must be at most {}.", display_value(max))),
            (None, None) => {}
        }
    }

    if let Some(values) = obj.get("enum") {
        parts.push(format!("Must be one of: `{}`.", spaced_json(values)));
    }

    if let Some(value) = obj.get("const") {
        parts.push(format!("Must be: `{}`.", spaced_json(value)));
    }

    match obj.get("additionalProperties") {
        Some(Value::Bool(false)) => parts.push("Cannot contain additional properties.".into()),
        Some(Value::Bool(true) | Value::Object(_)) => {
            parts.push("Can contain additional properties.".into())
        }
        _ => {}
    }

    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        let target = reference.strip_prefix("#/").unwrap_or(reference);
        parts.push(format!("Refer to *[{reference}](#{target})*."));
    }

    if let Some(default) = obj.get("default") {
        parts.push(format!("Default: `{}`.", spaced_json(default)));
    }

    if !parts.is_empty() {
        parts.insert(0, ":".to_string());
    }

    parts
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn as_object<'v>(value: &'v Value, source: &str, context: &str) -> Result<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        SchemaDocError::conversion(
            source,
            format!("{context}: expected a JSON object, found {}", kind(value)),
        )
    })
}

fn as_array<'v>(value: &'v Value, source: &str, context: &str) -> Result<&'v Vec<Value>> {
    value.as_array().ok_or_else(|| {
        SchemaDocError::conversion(
            source,
            format!("{context}: expected a JSON array, found {}", kind(value)),
        )
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn required_names(obj: &Map<String, Value>) -> Vec<&str> {
    obj.get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Strings render bare; everything else renders as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => spaced_json(other),
    }
}

/// Compact JSON with a space after each top-level comma.
fn spaced_json(value: &Value) -> String {
    match value {
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(Value::to_string).collect::<Vec<_>>().join(", ")
        ),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(schema: Value) -> String {
        MarkdownConverter::default()
            .parse_schema(&schema, "test.json")
            .expect("convert")
            .concat()
    }

    #[test]
    fn title_and_description() {
        let md = convert(json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Person",
            "description": "A human being"
        }));
        assert!(md.starts_with("# Person\n\n*A human being*\n\n"));
    }

    #[test]
    fn untitled_schema_gets_default_heading() {
        let md = convert(json!({"type": "object"}));
        assert_eq!(md, "# JSON Schema\n\n");
    }

    #[test]
    fn properties_render_type_and_required() {
        let md = convert(json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string", "description": "Full name"},
                "age": {"type": "integer", "minimum": 0}
            }
        }));
        assert!(md.contains("## Properties\n\n"));
        assert!(md.contains("- **`name`** *(string, required)*: Full name.\n"));
        assert!(md.contains("- **`age`** *(integer)*: Minimum: `0`.\n"));
    }

    #[test]
    fn property_order_follows_document() {
        let md = convert(json!({
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "string"}
            }
        }));
        let zeta = md.find("zeta").unwrap();
        let alpha = md.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn nested_properties_are_indented() {
        let md = convert(json!({
            "properties": {
                "address": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {"city": {"type": "string"}}
                }
            }
        }));
        assert!(md.contains(
            "- **`address`** *(object)*: Cannot contain additional properties.\n"
        ));
        assert!(md.contains("  - **`city`** *(string)*\n"));
    }

    #[test]
    fn composition_keywords() {
        let md = convert(json!({
            "properties": {
                "id": {"anyOf": [{"type": "string"}, {"type": "integer"}]}
            }
        }));
        assert!(md.contains("- **`id`**\n"));
        assert!(md.contains("  - **Any of**\n"));
        assert!(md.contains("    - *string*\n"));
        assert!(md.contains("    - *integer*\n"));
    }

    #[test]
    fn definitions_have_anchors_and_refs_link_to_them() {
        let md = convert(json!({
            "properties": {"owner": {"$ref": "#/definitions/user"}},
            "definitions": {"user": {"type": "object", "description": "A user?"}}
        }));
        assert!(md.contains("- **`owner`**: Refer to *[#/definitions/user](#definitions/user)*.\n"));
        assert!(md.contains("## Definitions\n\n"));
        assert!(md.contains("- <a id=\"definitions/user\"></a>**`user`** *(object)*: A user?\n"));
    }

    #[test]
    fn constraint_sentences() {
        let md = convert(json!({
            "properties": {
                "tags": {"type": "array", "minItems": 1, "maxItems": 3, "items": {"type": "string"}},
                "mode": {"enum": ["a", "b"], "default": "a"},
                "format": {"type": "string", "format": "uri", "const": "x"}
            }
        }));
        assert!(md.contains(
            "- **`tags`** *(array)*: Length must be between 1 and 3 (inclusive).\n"
        ));
        assert!(md.contains("  - **Items** *(string)*\n"));
        assert!(md.contains("- **`mode`**: Must be one of: `[\"a\", \"b\"]`. Default: `\"a\"`.\n"));
        assert!(md.contains("- **`format`** *(string, format: uri)*: Must be: `\"x\"`.\n"));
    }

    #[test]
    fn multi_paragraph_descriptions_use_br() {
        let md = convert(json!({
            "properties": {"note": {"description": "First.\n\nSecond"}}
        }));
        assert!(md.contains("- **`note`**: First.<br>  Second.\n"));
    }

    #[test]
    fn examples_respect_show_examples() {
        let schema = json!({
            "examples": [{"name": "x"}],
            "properties": {"name": {"type": "string", "examples": ["x"]}}
        });

        let all = convert(schema.clone());
        assert!(all.contains("## Examples\n\n"));
        assert!(all.contains("  Examples:\n"));

        let object_only = MarkdownConverter::new(ConverterOptions {
            show_examples: ShowExamples::Object,
            ..Default::default()
        })
        .parse_schema(&schema, "t.json")
        .unwrap()
        .concat();
        assert!(object_only.contains("## Examples"));
        assert!(!object_only.contains("Examples:\n"));

        let properties_only = MarkdownConverter::new(ConverterOptions {
            show_examples: ShowExamples::Properties,
            ..Default::default()
        })
        .parse_schema(&schema, "t.json")
        .unwrap()
        .concat();
        assert!(!properties_only.contains("## Examples"));
        assert!(properties_only.contains("  Examples:\n"));
    }

    #[test]
    fn yaml_examples() {
        let converter = MarkdownConverter::new(ConverterOptions {
            examples_as_yaml: true,
            show_examples: ShowExamples::All,
        });
        let md = converter
            .parse_schema(&json!({"examples": [{"name": "x"}]}), "t.json")
            .unwrap()
            .concat();
        assert!(md.contains("  ```yaml\n  name: x\n  ```\n"));
    }

    #[test]
    fn non_object_subschema_is_conversion_error() {
        let err = MarkdownConverter::default()
            .parse_schema(&json!({"properties": {"a": "string"}}), "docs/bad.json")
            .unwrap_err();
        assert!(err.is_content_error());
        assert!(err.to_string().contains("docs/bad.json"));
    }

    #[test]
    fn non_object_root_is_conversion_error() {
        let err = MarkdownConverter::default()
            .parse_schema(&json!(["$schema"]), "docs/list.json")
            .unwrap_err();
        assert!(matches!(err, SchemaDocError::Conversion { .. }));
    }

    #[test]
    fn show_examples_parsing() {
        assert_eq!("ALL".parse::<ShowExamples>().unwrap(), ShowExamples::All);
        assert_eq!("object".parse::<ShowExamples>().unwrap(), ShowExamples::Object);
        assert!("none".parse::<ShowExamples>().is_err());

        let mut plugin = PluginConfig::default();
        plugin.show_example = "properties".into();
        plugin.example_as_yaml = true;
        let opts = ConverterOptions::from_plugin(&plugin).unwrap();
        assert!(opts.examples_as_yaml);
        assert_eq!(opts.show_examples, ShowExamples::Properties);
    }
}
