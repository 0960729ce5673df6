use serde::Serialize;
use serde_json::Value;

use crate::error::ProjectionError;
use crate::parse::content::{FORM_URL_ENCODED, MULTIPART_FORM_DATA, RequestBody};
use crate::parse::schema::{Schema, SchemaOrRef, SchemaType};

const BINARY_FORMAT: &str = "binary";

/// A property of an object schema with the flags templates branch on. The
/// property's own schema keywords are carried alongside, unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    pub is_required: bool,
    pub is_binary: bool,
    pub is_array: bool,
    pub is_file_array: bool,
    #[serde(flatten)]
    pub schema: SchemaOrRef,
}

/// Describe the properties of `schema`, in declaration order.
pub fn project(schema: &Schema) -> Vec<PropertyDescriptor> {
    schema
        .properties
        .iter()
        .map(|(name, property)| describe(schema, name, property))
        .collect()
}

fn describe(owner: &Schema, name: &str, property: &SchemaOrRef) -> PropertyDescriptor {
    // Flags read the property's own keywords, whatever else it combines.
    let (is_binary, is_array, is_file_array) = match property.as_schema() {
        None => (false, false, false),
        Some(schema) => {
            let is_array = schema.is_type(SchemaType::Array);
            let file_items = schema
                .items
                .as_deref()
                .and_then(SchemaOrRef::as_schema)
                .is_some_and(is_binary);
            (is_binary(schema), is_array, is_array && file_items)
        }
    };

    PropertyDescriptor {
        name: name.to_string(),
        is_required: owner.is_required(name),
        is_binary,
        is_array,
        is_file_array,
        schema: property.clone(),
    }
}

fn is_binary(schema: &Schema) -> bool {
    schema.format.as_deref() == Some(BINARY_FORMAT)
}

/// Project a schema that arrives as an untyped value (from a template).
///
/// `null` and `$ref` nodes have no properties. A `properties` keyword that is
/// not a mapping, or any other shape the schema model rejects, is an error
/// naming `path`.
pub fn project_value(value: &Value, path: &str) -> Result<Vec<PropertyDescriptor>, ProjectionError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    if let Some(properties) = value.get("properties") {
        if !properties.is_object() {
            return Err(ProjectionError::PropertiesNotAMapping {
                path: path.to_string(),
            });
        }
    }

    let schema: SchemaOrRef =
        serde_json::from_value(value.clone()).map_err(|e| ProjectionError::InvalidSchema {
            path: path.to_string(),
            message: e.to_string(),
        })?;

    Ok(match schema.as_schema() {
        Some(schema) => project(schema),
        None => Vec::new(),
    })
}

/// Properties of the `multipart/form-data` body schema, if it is an object.
pub fn multipart_form_data_properties(body: &RequestBody) -> Vec<PropertyDescriptor> {
    content_properties(body, MULTIPART_FORM_DATA)
}

/// Properties of the `application/x-www-form-urlencoded` body schema, if it
/// is an object.
pub fn form_url_encoded_properties(body: &RequestBody) -> Vec<PropertyDescriptor> {
    content_properties(body, FORM_URL_ENCODED)
}

fn content_properties(body: &RequestBody, content_type: &str) -> Vec<PropertyDescriptor> {
    body.schema_for(content_type)
        .and_then(SchemaOrRef::as_schema)
        .filter(|schema| schema.is_type(SchemaType::Object) && !schema.properties.is_empty())
        .map(project)
        .unwrap_or_default()
}
