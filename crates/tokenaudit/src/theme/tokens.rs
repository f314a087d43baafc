//! YAML/JSON design-token parsing.
//!
//! Token files are mappings from names to raw values. Nested groups are
//! flattened with `.`, so `brand: { 500: ... }` defines `brand.500`, which is
//! what `{brand.500}` references point at. A leaf may also be written in the
//! W3C design-tokens shape `{ $value: ... }` (or `value:`).
//!
//! When the root has `light:` and/or `dark:` mappings they become the two
//! mode tables; otherwise the whole file is the light table.
//!
//! ```yaml
//! light:
//!   brand:
//!     500: "262 84% 52%"
//!   primary: "{brand.500}"
//!   primary-foreground: "0 0% 98%"
//! dark:
//!   primary: "263 70% 60%"
//! ```
//!
//! JSON is valid YAML, so `.json` token files go through the same parser.

use serde_yaml::{Mapping, Value};

use super::graph::{TokenDefinition, TokenGraph};
use super::TokenTables;
use crate::error::ThemeError;

/// Parses a YAML or JSON token file into light and dark tables.
pub fn parse_tokens(yaml: &str) -> Result<TokenTables, ThemeError> {
    let root: Value = serde_yaml::from_str(yaml).map_err(|e| ThemeError::Parse {
        path: None,
        message: e.to_string(),
    })?;

    let mapping = match &root {
        Value::Mapping(m) => m,
        Value::Null => return Ok(TokenTables::default()),
        _ => {
            return Err(ThemeError::Parse {
                path: None,
                message: "token file root must be a mapping".to_string(),
            })
        }
    };

    let light = mapping.get("light").and_then(Value::as_mapping);
    let dark = mapping.get("dark").and_then(Value::as_mapping);

    let mut tables = TokenTables::default();
    if light.is_some() || dark.is_some() {
        if let Some(light) = light {
            flatten(light, "", &mut tables.light)?;
        }
        if let Some(dark) = dark {
            flatten(dark, "", &mut tables.dark)?;
        }
    } else {
        flatten(mapping, "", &mut tables.light)?;
    }
    Ok(tables)
}

fn flatten(mapping: &Mapping, prefix: &str, graph: &mut TokenGraph) -> Result<(), ThemeError> {
    for (key, value) in mapping {
        let key = key_to_string(key).ok_or_else(|| ThemeError::Parse {
            path: None,
            message: format!("unsupported token key {:?} under '{}'", key, prefix),
        })?;
        let name = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Mapping(group) => match leaf_value(group) {
                Some(raw) => graph.insert(TokenDefinition::new(name, raw)),
                None => flatten(group, &name, graph)?,
            },
            other => match scalar_to_string(other) {
                Some(raw) => graph.insert(TokenDefinition::new(name, raw)),
                None => {
                    return Err(ThemeError::Parse {
                        path: None,
                        message: format!("token '{}' has an unsupported value", name),
                    })
                }
            },
        }
    }
    Ok(())
}

fn leaf_value(group: &Mapping) -> Option<String> {
    group
        .get("$value")
        .or_else(|| group.get("value"))
        .and_then(scalar_to_string)
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
