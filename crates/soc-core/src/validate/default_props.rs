use std::collections::HashSet;

use log::warn;

use super::ValidationError;
use crate::parse::content::{Content, RequestBodyOrRef};
use crate::parse::schema::{Combinator, Schema, SchemaOrRef};
use crate::parse::spec::OpenApiSpec;

const FORBIDDEN: &str = "default";

/// Find every property named `default`, in any case, reachable from
/// `components.schemas` and from operation request and response bodies.
///
/// `$ref` nodes are not followed; a bundled document keeps each shared
/// schema under `components` where it is scanned once.
pub fn find_default_properties(spec: &OpenApiSpec) -> Vec<ValidationError> {
    let mut scan = Scan::default();

    for (name, schema) in spec.schemas() {
        scan.schema_or_ref(schema, format!("components.schemas.{name}"));
    }

    for (route, item) in &spec.paths {
        for (method, op) in &item.operations {
            let prefix = format!("paths.{route}.{method}");

            match &op.request_body {
                Some(RequestBodyOrRef::RequestBody(body)) => {
                    scan.content(&body.content, &format!("{prefix}.requestBody"));
                }
                Some(RequestBodyOrRef::Ref { ref_path }) => {
                    warn!("{prefix}.requestBody: not scanning unresolved {ref_path}");
                }
                None => {}
            }

            for (status, response) in &op.responses {
                if let Some(response) = response.as_inline() {
                    scan.content(&response.content, &format!("{prefix}.responses.{status}"));
                }
            }
        }
    }

    scan.errors
}

#[derive(Default)]
struct Scan {
    /// Schemas already walked, by address.
    visited: HashSet<*const Schema>,
    errors: Vec<ValidationError>,
}

impl Scan {
    fn content(&mut self, content: &Content, prefix: &str) {
        for (media_type, media) in content {
            if let Some(schema) = &media.schema {
                self.schema_or_ref(schema, format!("{prefix}.content.{media_type}.schema"));
            }
        }
    }

    fn schema_or_ref(&mut self, schema: &SchemaOrRef, path: String) {
        if let SchemaOrRef::Schema(schema) = schema {
            self.schema(schema, &path);
        }
    }

    fn schema(&mut self, schema: &Schema, path: &str) {
        if !self.visited.insert(schema as *const Schema) {
            return;
        }

        for (key, property) in &schema.properties {
            let property_path = format!("{path}.properties.{key}");
            if key.eq_ignore_ascii_case(FORBIDDEN) {
                self.errors.push(ValidationError::error(
                    property_path.clone(),
                    format!(
                        "Property with key name '{key}' found. Properties named 'default' (any case) can cause issues in generated code."
                    ),
                ));
            }
            self.schema_or_ref(property, property_path);
        }

        if let Some(items) = &schema.items {
            self.schema_or_ref(items, format!("{path}.items"));
        }

        for combinator in Combinator::ALL {
            for (i, branch) in schema.branches(combinator).iter().enumerate() {
                self.schema_or_ref(branch, format!("{path}.{}[{i}]", combinator.keyword()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn paths(yaml: &str) -> Vec<String> {
        let spec = parse::from_yaml(yaml).unwrap();
        find_default_properties(&spec)
            .into_iter()
            .map(|e| e.path)
            .collect()
    }

    #[test]
    fn test_clean_document_has_no_errors() {
        let found = paths(
            r#"
openapi: 3.0.3
info: { title: T, version: "1" }
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        name: { type: string, default: rex }
        defaults: { type: string }
"#,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_case_is_preserved_in_locator() {
        let found = paths(
            r#"
openapi: 3.0.3
info: { title: T, version: "1" }
paths: {}
components:
  schemas:
    Upper:
      type: object
      properties:
        DEFAULT: { type: string }
        Default: { type: string }
"#,
        );
        assert_eq!(
            found,
            vec![
                "components.schemas.Upper.properties.DEFAULT",
                "components.schemas.Upper.properties.Default",
            ]
        );
    }

    #[test]
    fn test_combinators_inside_items() {
        let found = paths(
            r#"
openapi: 3.0.3
info: { title: T, version: "1" }
paths: {}
components:
  schemas:
    Holder:
      type: object
      properties:
        things:
          type: array
          items:
            oneOf:
              - $ref: '#/components/schemas/Other'
              - type: object
                properties:
                  default: { type: string }
"#,
        );
        assert_eq!(
            found,
            vec!["components.schemas.Holder.properties.things.items.oneOf[1].properties.default"]
        );
    }

    #[test]
    fn test_message_names_the_key() {
        let spec = parse::from_yaml(
            r#"
openapi: 3.0.3
info: { title: T, version: "1" }
paths: {}
components:
  schemas:
    Pet:
      properties:
        Default: { type: string }
"#,
        )
        .unwrap();
        let errors = find_default_properties(&spec);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Property with key name 'Default' found."));
        assert!(errors[0].is_error());
    }
}
