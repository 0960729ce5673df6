pub mod content;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod schema;
pub mod server;
pub mod spec;

use std::path::Path;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    from_value(yaml_value(input)?)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    from_value(serde_json::from_str(input)?)
}

/// Build the typed document from an already loaded (and possibly bundled) value.
pub fn from_value(value: serde_json::Value) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_value(value)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse document text into an untyped value. `.json` files are read as
/// JSON, everything else as YAML.
pub fn to_value(path: &Path, input: &str) -> Result<serde_json::Value, ParseError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(serde_json::from_str(input)?),
        _ => yaml_value(input),
    }
}

fn yaml_value(input: &str) -> Result<serde_json::Value, ParseError> {
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    yaml_to_json(yaml)
}

/// YAML allows non-string mapping keys (`200:` under `responses`); JSON
/// does not, so keys are stringified on the way over.
fn yaml_to_json(value: serde_yaml_ng::Value) -> Result<serde_json::Value, ParseError> {
    use serde_yaml_ng::Value as Yaml;

    Ok(match value {
        Yaml::Null => serde_json::Value::Null,
        Yaml::Bool(b) => serde_json::Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
        }
        Yaml::String(s) => serde_json::Value::String(s),
        Yaml::Sequence(items) => serde_json::Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = serde_json::Map::new();
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            serde_json::Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml_ng::Value) -> Result<String, ParseError> {
    use serde_yaml_ng::Value as Yaml;

    Ok(match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml_ng::to_string(&other)?.trim_end().to_string(),
    })
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_response_keys_become_strings() {
        let value = yaml_value("responses:\n  200: { description: ok }\n  default: { description: err }")
            .unwrap();
        let keys: Vec<_> = value["responses"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["200", "default"]);
    }

    #[test]
    fn test_json_extension_selects_json() {
        let value = to_value(Path::new("spec.json"), r#"{"openapi": "3.0.3"}"#).unwrap();
        assert_eq!(value["openapi"], "3.0.3");
        assert!(to_value(Path::new("spec.json"), "openapi: 3.0.3").is_err());
    }

    #[test]
    fn test_rejects_swagger_2() {
        let result = from_yaml("openapi: '2.0'\ninfo: { title: T, version: '1' }\npaths: {}");
        assert!(matches!(result, Err(ParseError::UnsupportedVersion(v)) if v == "2.0"));
    }
}
