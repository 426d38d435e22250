//! Fenced example blocks for schema documentation.
//!
//! Examples are rendered as JSON (4-space indent) or YAML, with every line
//! prefixed by the bullet indentation so the block nests under its property.

use serde_json::Value;

use schemadoc_shared::{Result, SchemaDocError};

/// Render each value in `examples` as a fenced block.
///
/// When `add_header` is set an `Examples:` label precedes the blocks.
pub(crate) fn render(
    examples: &[Value],
    indentation: &str,
    as_yaml: bool,
    add_header: bool,
    source: &str,
) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(examples.len() + 1);

    if add_header {
        lines.push(format!("\n{indentation}Examples:\n"));
    }

    let lang = if as_yaml { "yaml" } else { "json" };
    for example in examples {
        let body = if as_yaml {
            dump_yaml(example, source)?
        } else {
            dump_json(example, source)?
        };
        let body = with_line_head(&body, indentation);
        lines.push(format!(
            "{indentation}```{lang}\n{body}\n{indentation}```\n\n"
        ));
    }

    Ok(lines)
}

fn dump_json(value: &Value, source: &str) -> Result<String> {
    use serde::Serialize;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| SchemaDocError::conversion(source, format!("example is not serializable: {e}")))?;

    String::from_utf8(buf)
        .map_err(|e| SchemaDocError::conversion(source, format!("example is not UTF-8: {e}")))
}

fn dump_yaml(value: &Value, source: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| SchemaDocError::conversion(source, format!("example is not serializable: {e}")))?;
    Ok(yaml.trim_end_matches('\n').to_string())
}

fn with_line_head(text: &str, head: &str) -> String {
    text.lines()
        .map(|line| format!("{head}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_examples_are_indented_and_fenced() {
        let lines = render(&[json!({"a": 1})], "  ", false, false, "s.json").unwrap();
        assert_eq!(lines, vec!["  ```json\n  {\n      \"a\": 1\n  }\n  ```\n\n"]);
    }

    #[test]
    fn yaml_examples_use_yaml_fence() {
        let lines = render(&[json!({"name": "x"})], "", true, true, "s.json").unwrap();
        assert_eq!(lines[0], "\nExamples:\n");
        assert_eq!(lines[1], "```yaml\nname: x\n```\n\n");
    }

    #[test]
    fn scalar_example() {
        let lines = render(&[json!(42)], "    ", false, false, "s.json").unwrap();
        assert_eq!(lines, vec!["    ```json\n    42\n    ```\n\n"]);
    }
}
