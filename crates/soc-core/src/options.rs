use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::transform::name_normalizer::class_name;

/// Options for one generation run. Unknown keys pass through to templates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub snake: bool,
    /// Filled in by a language model's `prepare_model`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl GenerationOptions {
    /// Overlay the options set in `other` onto a copy of `self`.
    pub fn merged_with(&self, other: &GenerationOptions) -> GenerationOptions {
        let pick = |a: &Option<String>, b: &Option<String>| b.clone().or_else(|| a.clone());
        let mut extra = self.extra.clone();
        extra.extend(other.extra.clone());
        GenerationOptions {
            namespace: pick(&self.namespace, &other.namespace),
            name: pick(&self.name, &other.name),
            class_name: pick(&self.class_name, &other.class_name),
            snake: self.snake || other.snake,
            package_name: pick(&self.package_name, &other.package_name),
            service_name: pick(&self.service_name, &other.service_name),
            extra,
        }
    }

    /// The client name; empty until [`resolve_options`] has run.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// `<namespace>/<name>` when a namespace is set, otherwise the name.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}/{}", self.name()),
            None => self.name().to_string(),
        }
    }
}

/// Fill in `name` and `className` from the spec file name when absent.
pub fn resolve_options(spec_path: &Path, input: &GenerationOptions) -> GenerationOptions {
    let mut options = input.clone();

    let name = options
        .name
        .get_or_insert_with(|| default_name(spec_path))
        .clone();
    if options.class_name.is_none() {
        options.class_name = Some(class_name(&name));
    }
    options
}

fn default_name(spec_path: &Path) -> String {
    let stem = spec_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{stem}-client")
}
