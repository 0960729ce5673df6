use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::options::GenerationOptions;

/// Project configuration loaded from `.small-openapi-codegen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocConfig {
    pub input: Option<String>,
    pub output: String,
    pub language: Language,
    pub options: GenerationOptions,
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: "generated".to_string(),
            language: Language::default(),
            options: GenerationOptions::default(),
        }
    }
}

/// Target language of the generated client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ts", alias = "typescript")]
    TypeScript,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "ts",
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".small-openapi-codegen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SocConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SocConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# small-openapi-codegen configuration
# input: openapi.yaml
output: generated
language: ts

options:
  # name: my-api-client        # defaults to <spec file name>-client
  # className: MyApiClient     # defaults to the upper camel case of name
  # namespace: "@acme"         # package.json name becomes @acme/<name>
  snake: false                 # snake_case identifiers instead of camelCase
"#
}
