use heck::ToUpperCamelCase;
use soc_core::parse::schema::{
    AdditionalProperties, Combinator, Schema, SchemaNode, SchemaOrRef, SchemaType, TypeSet,
};

/// Component schemas by type name.
///
/// A dereferenced document has lost its `$ref`s, so a schema that is
/// structurally equal to a component is printed as that component's name.
/// Only objects with properties, enums and compositions are matched;
/// aliases of primitives and arrays stay inline.
#[derive(Debug, Default)]
pub struct NamedSchemas {
    shapes: Vec<(Schema, String)>,
}

impl NamedSchemas {
    pub fn new<'a>(schemas: impl IntoIterator<Item = (&'a String, &'a SchemaOrRef)>) -> Self {
        let shapes = schemas
            .into_iter()
            .filter_map(|(name, schema)| {
                let schema = schema.as_schema().filter(|s| is_named_shape(s))?;
                Some((shape(schema), type_name(name)))
            })
            .collect();
        Self { shapes }
    }

    fn name_of(&self, schema: &Schema) -> Option<&str> {
        if self.shapes.is_empty() || !is_named_shape(schema) {
            return None;
        }
        let candidate = shape(schema);
        self.shapes
            .iter()
            .find(|(s, _)| *s == candidate)
            .map(|(_, name)| name.as_str())
    }
}

fn is_named_shape(schema: &Schema) -> bool {
    !schema.properties.is_empty()
        || !schema.enum_values.is_empty()
        || Combinator::ALL
            .into_iter()
            .any(|c| !schema.branches(c).is_empty())
}

/// A schema without its extension keywords, which property descriptors
/// add to.
fn shape(schema: &Schema) -> Schema {
    let mut schema = schema.clone();
    schema.extensions.clear();
    schema
}

/// Map a schema position to its TypeScript type.
pub fn schema_to_ts(schema: &SchemaOrRef, names: &NamedSchemas) -> String {
    if let Some(name) = schema.as_schema().and_then(|s| names.name_of(s)) {
        return name.to_string();
    }
    alias_to_ts(schema, names)
}

/// Like [`schema_to_ts`], but the outermost schema is never replaced by a
/// component name. Used for the right-hand side of `export type`.
pub fn alias_to_ts(schema: &SchemaOrRef, names: &NamedSchemas) -> String {
    match schema.node() {
        SchemaNode::Reference(pointer) => ref_to_ts(pointer),
        SchemaNode::Object(s) => nullable(s, object_to_ts(s, names)),
        SchemaNode::Array { schema, items } => {
            let inner = items.map_or_else(|| "unknown".to_string(), |i| schema_to_ts(i, names));
            let array = if is_compound(&inner) {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            };
            nullable(schema, array)
        }
        SchemaNode::Combinator {
            schema,
            kind,
            branches,
        } => {
            let separator = match kind {
                Combinator::AllOf => " & ",
                Combinator::AnyOf | Combinator::OneOf => " | ",
            };
            let parts: Vec<String> = branches
                .iter()
                .map(|b| {
                    let ts = schema_to_ts(b, names);
                    if is_compound(&ts) { format!("({ts})") } else { ts }
                })
                .collect();
            nullable(schema, parts.join(separator))
        }
        SchemaNode::Primitive(s) => nullable(s, primitive_to_ts(s)),
    }
}

/// Interface or alias name for a component schema.
pub fn type_name(name: &str) -> String {
    name.to_upper_camel_case()
}

/// A property key, quoted when it is not a plain identifier.
pub fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        name.to_string()
    } else {
        serde_json::Value::from(name).to_string()
    }
}

fn ref_to_ts(pointer: &str) -> String {
    let name = pointer.rsplit('/').next().unwrap_or(pointer);
    type_name(&name.replace("~1", "/").replace("~0", "~"))
}

fn object_to_ts(schema: &Schema, names: &NamedSchemas) -> String {
    if schema.properties.is_empty() {
        return match &schema.additional_properties {
            Some(AdditionalProperties::Schema(value)) => {
                format!("Record<string, {}>", schema_to_ts(value, names))
            }
            _ => "Record<string, unknown>".to_string(),
        };
    }
    let fields: Vec<String> = schema
        .properties
        .iter()
        .map(|(name, property)| {
            let optional = if schema.is_required(name) { "" } else { "?" };
            format!("{}{optional}: {}", property_key(name), schema_to_ts(property, names))
        })
        .collect();
    format!("{{ {} }}", fields.join("; "))
}

fn primitive_to_ts(schema: &Schema) -> String {
    if !schema.enum_values.is_empty() {
        let literals: Vec<String> = schema.enum_values.iter().map(|v| v.to_string()).collect();
        return literals.join(" | ");
    }
    match &schema.schema_type {
        None => "unknown".to_string(),
        Some(TypeSet::Single(ty)) => type_to_ts(*ty, schema),
        Some(TypeSet::Multiple(types)) => {
            let parts: Vec<String> = types.iter().map(|ty| type_to_ts(*ty, schema)).collect();
            parts.join(" | ")
        }
    }
}

fn type_to_ts(ty: SchemaType, schema: &Schema) -> String {
    match ty {
        SchemaType::String if schema.format.as_deref() == Some("binary") => "Blob".to_string(),
        SchemaType::String => "string".to_string(),
        SchemaType::Integer | SchemaType::Number => "number".to_string(),
        SchemaType::Boolean => "boolean".to_string(),
        SchemaType::Null => "null".to_string(),
        SchemaType::Array => "unknown[]".to_string(),
        SchemaType::Object => "Record<string, unknown>".to_string(),
    }
}

fn nullable(schema: &Schema, ts: String) -> String {
    if schema.nullable == Some(true) {
        format!("{ts} | null")
    } else {
        ts
    }
}

fn is_compound(ts: &str) -> bool {
    ts.contains(" | ") || ts.contains(" & ")
}
