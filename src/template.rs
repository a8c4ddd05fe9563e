//! Placeholder extraction from JSON templates.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use crate::error::JsonPathError;
use crate::lookup;

/// Collect `${name}` placeholders from a JSON document.
///
/// Returns placeholder name → every concrete path whose string value is
/// exactly `${name}`. The input must decode to a JSON object.
///
/// ```
/// let found = jpath::parse_json_template(r#"{"a": "${host}", "b": ["${host}"]}"#).unwrap();
/// assert_eq!(found["host"], vec!["$.a".to_string(), "$.b[0]".to_string()]);
/// ```
pub fn parse_json_template(
    json_text: &str,
) -> Result<BTreeMap<String, Vec<String>>, JsonPathError> {
    let doc: Value = serde_json::from_str(json_text)?;
    if !doc.is_object() {
        return Err(JsonPathError::TemplateRoot);
    }
    let placeholder = Regex::new(r"^\$\{(.+)\}$").expect("builtin regex");
    let mut found = BTreeMap::new();
    collect_placeholders(&doc, "$", &placeholder, &mut found)?;
    Ok(found)
}

/// Walk one level of children via `.*` lookup, recursing into containers.
fn collect_placeholders(
    doc: &Value,
    path: &str,
    placeholder: &Regex,
    found: &mut BTreeMap<String, Vec<String>>,
) -> Result<(), JsonPathError> {
    for (child_path, child) in lookup(doc, &format!("{path}.*"))? {
        match child {
            Value::String(text) => {
                if let Some(captures) = placeholder.captures(text) {
                    if let Some(name) = captures.get(1) {
                        found
                            .entry(name.as_str().to_string())
                            .or_default()
                            .push(child_path);
                    }
                }
            }
            Value::Array(_) | Value::Object(_) => {
                collect_placeholders(doc, &child_path, placeholder, found)?;
            }
            _ => {}
        }
    }
    Ok(())
}
