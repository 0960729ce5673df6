//! Request bodies, responses and the `content` maps they share.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

pub const APPLICATION_JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// Response key for the catch-all response.
pub const DEFAULT_RESPONSE: &str = "default";

/// Media types keyed by content type, in document order.
pub type Content = IndexMap<String, MediaType>;

/// One entry of a `content` map. Encoding and example objects are carried
/// as raw values; nothing downstream reads them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub content: Content,

    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    pub fn media_type(&self, content_type: &str) -> Option<&MediaType> {
        self.content.get(content_type)
    }

    /// The schema declared for `content_type`, if any.
    pub fn schema_for(&self, content_type: &str) -> Option<&SchemaOrRef> {
        self.media_type(content_type)?.schema.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: Content,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, serde_json::Value>,
}

impl Response {
    /// The `application/json` body schema.
    pub fn json_schema(&self) -> Option<&SchemaOrRef> {
        self.content.get(APPLICATION_JSON)?.schema.as_ref()
    }
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}

impl RequestBodyOrRef {
    /// The inline body, or `None` for a reference left unresolved.
    pub fn as_inline(&self) -> Option<&RequestBody> {
        match self {
            RequestBodyOrRef::Ref { .. } => None,
            RequestBodyOrRef::RequestBody(body) => Some(body),
        }
    }
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}

impl ResponseOrRef {
    pub fn as_inline(&self) -> Option<&Response> {
        match self {
            ResponseOrRef::Ref { .. } => None,
            ResponseOrRef::Response(response) => Some(response),
        }
    }
}
