use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::content::{RequestBodyOrRef, ResponseOrRef};
use super::operation::PathItem;
use super::parameter::ParameterOrRef;
use super::schema::SchemaOrRef;
use super::server::Server;

/// The `info` block. Only `title`, `version` and `description` feed the
/// generated package; the rest is kept for templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// The four `components` sections internal references may point into.
/// Anything else (security schemes, examples, headers) stays raw in `other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Components {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaOrRef>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterOrRef>,
    #[serde(rename = "requestBodies", skip_serializing_if = "IndexMap::is_empty")]
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,
    #[serde(flatten)]
    pub other: IndexMap<String, serde_json::Value>,
}

/// An OpenAPI 3.x document after parsing.
///
/// `paths` keeps file order, which is also the order of the generated
/// client methods. Top-level keys without a field here (`tags`, `security`,
/// `x-` extensions) are kept in `extensions` and reach templates unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl OpenApiSpec {
    /// Named schemas under `components.schemas`, empty when there are none.
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &SchemaOrRef)> {
        self.components.iter().flat_map(|c| c.schemas.iter())
    }

    /// Number of method entries across all paths.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.operations.len()).sum()
    }
}
