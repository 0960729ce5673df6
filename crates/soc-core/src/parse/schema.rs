use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    pub fn contains(&self, ty: SchemaType) -> bool {
        match self {
            TypeSet::Single(t) => *t == ty,
            TypeSet::Multiple(ts) => ts.contains(&ty),
        }
    }
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// The `required` keyword. Anything other than a list of names is kept
/// verbatim and means "nothing is required".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredList {
    Names(Vec<String>),
    Other(serde_json::Value),
}

impl RequiredList {
    pub fn contains(&self, name: &str) -> bool {
        match self {
            RequiredList::Names(names) => names.iter().any(|n| n == name),
            RequiredList::Other(_) => false,
        }
    }
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// A JSON Schema object (OpenAPI 3.x subset). Keywords without a dedicated
/// field are kept in `extensions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    // Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<RequiredList>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    // Composition
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Constraints, vendor extensions, and any other keyword.
    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}

/// One of the three composition keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    AllOf,
    AnyOf,
    OneOf,
}

impl Combinator {
    pub const ALL: [Combinator; 3] = [Combinator::AllOf, Combinator::AnyOf, Combinator::OneOf];

    pub fn keyword(self) -> &'static str {
        match self {
            Combinator::AllOf => "allOf",
            Combinator::AnyOf => "anyOf",
            Combinator::OneOf => "oneOf",
        }
    }
}

impl Schema {
    pub fn is_type(&self, ty: SchemaType) -> bool {
        self.schema_type.as_ref().is_some_and(|t| t.contains(ty))
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.as_ref().is_some_and(|r| r.contains(name))
    }

    pub fn branches(&self, combinator: Combinator) -> &[SchemaOrRef] {
        match combinator {
            Combinator::AllOf => &self.all_of,
            Combinator::AnyOf => &self.any_of,
            Combinator::OneOf => &self.one_of,
        }
    }

    /// The first non-empty composition keyword, checked in `oneOf`, `anyOf`,
    /// `allOf` order.
    fn composition(&self) -> Option<(Combinator, &[SchemaOrRef])> {
        [Combinator::OneOf, Combinator::AnyOf, Combinator::AllOf]
            .into_iter()
            .map(|c| (c, self.branches(c)))
            .find(|(_, branches)| !branches.is_empty())
    }
}

/// What a schema position is, for code that has to treat each shape differently.
#[derive(Debug, Clone, Copy)]
pub enum SchemaNode<'a> {
    /// An unresolved `$ref`.
    Reference(&'a str),
    Object(&'a Schema),
    Array {
        schema: &'a Schema,
        items: Option<&'a SchemaOrRef>,
    },
    Combinator {
        schema: &'a Schema,
        kind: Combinator,
        branches: &'a [SchemaOrRef],
    },
    Primitive(&'a Schema),
}

impl SchemaOrRef {
    pub fn node(&self) -> SchemaNode<'_> {
        match self {
            SchemaOrRef::Ref { ref_path } => SchemaNode::Reference(ref_path),
            SchemaOrRef::Schema(schema) => schema.node(),
        }
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrRef::Schema(s) => Some(s),
            SchemaOrRef::Ref { .. } => None,
        }
    }
}

impl Schema {
    /// Classify this schema. Composition wins over `type`, arrays over objects.
    pub fn node(&self) -> SchemaNode<'_> {
        if let Some((kind, branches)) = self.composition() {
            return SchemaNode::Combinator {
                schema: self,
                kind,
                branches,
            };
        }
        if self.is_type(SchemaType::Array) || self.items.is_some() {
            return SchemaNode::Array {
                schema: self,
                items: self.items.as_deref(),
            };
        }
        if self.is_type(SchemaType::Object)
            || !self.properties.is_empty()
            || self.additional_properties.is_some()
        {
            return SchemaNode::Object(self);
        }
        SchemaNode::Primitive(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(yaml: &str) -> SchemaOrRef {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_reference_node() {
        let s = schema("$ref: '#/components/schemas/Pet'");
        assert!(matches!(s.node(), SchemaNode::Reference("#/components/schemas/Pet")));
    }

    #[test]
    fn test_combinator_wins_over_object() {
        let s = schema(
            r#"
type: object
properties:
  a: { type: string }
anyOf:
  - type: object
"#,
        );
        match s.node() {
            SchemaNode::Combinator { kind, branches, .. } => {
                assert_eq!(kind, Combinator::AnyOf);
                assert_eq!(branches.len(), 1);
            }
            other => panic!("expected combinator, got {other:?}"),
        }
    }

    #[test]
    fn test_array_and_primitive_nodes() {
        let arr = schema("type: array\nitems: { type: string }");
        assert!(matches!(arr.node(), SchemaNode::Array { items: Some(_), .. }));

        let prim = schema("type: string\nformat: binary");
        assert!(matches!(prim.node(), SchemaNode::Primitive(_)));
    }

    #[test]
    fn test_unknown_keywords_are_kept() {
        let s = schema("type: string\nmaxLength: 10\nx-internal: true");
        let inner = s.as_schema().unwrap();
        assert_eq!(inner.extensions["maxLength"], serde_json::json!(10));
        assert_eq!(inner.extensions["x-internal"], serde_json::json!(true));
    }

    #[test]
    fn test_required_that_is_not_a_list() {
        let s = schema("type: object\nrequired: true\nproperties:\n  a: { type: string }");
        let inner = s.as_schema().unwrap();
        assert!(matches!(inner.required, Some(RequiredList::Other(_))));
        assert!(!inner.is_required("a"));
    }
}
