use std::collections::HashSet;

use indexmap::IndexMap;

use super::content::{Content, RequestBodyOrRef, ResponseOrRef};
use super::operation::{Operation, PathItem};
use super::parameter::ParameterOrRef;
use super::schema::{AdditionalProperties, Schema, SchemaOrRef};
use super::spec::{Components, OpenApiSpec};
use crate::error::ResolveError;

/// Dereferences the internal `#/components/...` pointers of a document.
///
/// A schema that refers back to itself keeps its `$ref` at the point where
/// the cycle closes; every other reference is replaced by its target.
pub struct RefResolver<'a> {
    components: Option<&'a Components>,
    visiting: HashSet<String>,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
            visiting: HashSet::new(),
        }
    }

    /// Resolve the whole document, returning a copy without `$ref` nodes under
    /// `paths` and `components`.
    pub fn resolve_spec(&mut self, spec: &OpenApiSpec) -> Result<OpenApiSpec, ResolveError> {
        let mut resolved = spec.clone();

        for item in resolved.paths.values_mut() {
            self.resolve_path_item(item)?;
        }

        if let Some(ref mut components) = resolved.components {
            for (name, schema) in components.schemas.iter_mut() {
                // A component is its own cycle root: a `$ref` back to it stays.
                let pointer = schema_pointer(name);
                self.visiting.insert(pointer.clone());
                let result = self.resolve_schema_or_ref(schema);
                self.visiting.remove(&pointer);
                *schema = result?;
            }
            for param in components.parameters.values_mut() {
                *param = self.resolve_parameter_or_ref(param)?;
            }
            for body in components.request_bodies.values_mut() {
                *body = self.resolve_request_body_or_ref(body)?;
            }
            for resp in components.responses.values_mut() {
                *resp = self.resolve_response_or_ref(resp)?;
            }
        }

        Ok(resolved)
    }

    fn resolve_path_item(&mut self, item: &mut PathItem) -> Result<(), ResolveError> {
        for p in &mut item.parameters {
            *p = self.resolve_parameter_or_ref(p)?;
        }
        for op in item.operations.values_mut() {
            self.resolve_operation(op)?;
        }
        Ok(())
    }

    fn resolve_operation(&mut self, op: &mut Operation) -> Result<(), ResolveError> {
        for p in &mut op.parameters {
            *p = self.resolve_parameter_or_ref(p)?;
        }

        if let Some(ref body) = op.request_body {
            op.request_body = Some(self.resolve_request_body_or_ref(body)?);
        }

        for resp in op.responses.values_mut() {
            *resp = self.resolve_response_or_ref(resp)?;
        }

        Ok(())
    }

    pub fn resolve_schema_or_ref(
        &mut self,
        schema_or_ref: &SchemaOrRef,
    ) -> Result<SchemaOrRef, ResolveError> {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => {
                if self.visiting.contains(ref_path) {
                    return Ok(schema_or_ref.clone());
                }
                let target = self.lookup_schema(ref_path)?;
                self.visiting.insert(ref_path.clone());
                let result = self.resolve_schema_or_ref(&target);
                self.visiting.remove(ref_path);
                result
            }
            SchemaOrRef::Schema(schema) => {
                let resolved = self.resolve_schema(schema)?;
                Ok(SchemaOrRef::Schema(Box::new(resolved)))
            }
        }
    }

    fn resolve_schema(&mut self, schema: &Schema) -> Result<Schema, ResolveError> {
        let mut resolved = schema.clone();

        for prop in resolved.properties.values_mut() {
            *prop = self.resolve_schema_or_ref(prop)?;
        }

        if let Some(ref items) = schema.items {
            resolved.items = Some(Box::new(self.resolve_schema_or_ref(items)?));
        }

        for branches in [
            &mut resolved.all_of,
            &mut resolved.one_of,
            &mut resolved.any_of,
        ] {
            for branch in branches.iter_mut() {
                *branch = self.resolve_schema_or_ref(branch)?;
            }
        }

        if let Some(AdditionalProperties::Schema(ref s)) = schema.additional_properties {
            resolved.additional_properties = Some(AdditionalProperties::Schema(Box::new(
                self.resolve_schema_or_ref(s)?,
            )));
        }

        Ok(resolved)
    }

    fn resolve_parameter_or_ref(
        &mut self,
        param: &ParameterOrRef,
    ) -> Result<ParameterOrRef, ResolveError> {
        let mut resolved = match param {
            ParameterOrRef::Ref { ref_path } => {
                let section = self.components.map(|c| &c.parameters);
                lookup(section, ref_path, "parameters", |p| match p {
                    ParameterOrRef::Parameter(p) => Some(p.clone()),
                    ParameterOrRef::Ref { .. } => None,
                })?
            }
            ParameterOrRef::Parameter(p) => p.clone(),
        };
        if let Some(ref s) = resolved.schema {
            resolved.schema = Some(self.resolve_schema_or_ref(s)?);
        }
        Ok(ParameterOrRef::Parameter(resolved))
    }

    fn resolve_request_body_or_ref(
        &mut self,
        body: &RequestBodyOrRef,
    ) -> Result<RequestBodyOrRef, ResolveError> {
        let mut resolved = match body {
            RequestBodyOrRef::Ref { ref_path } => {
                let section = self.components.map(|c| &c.request_bodies);
                lookup(section, ref_path, "requestBodies", |b| b.as_inline().cloned())?
            }
            RequestBodyOrRef::RequestBody(b) => b.clone(),
        };
        self.resolve_media_types(&mut resolved.content)?;
        Ok(RequestBodyOrRef::RequestBody(resolved))
    }

    fn resolve_response_or_ref(
        &mut self,
        resp: &ResponseOrRef,
    ) -> Result<ResponseOrRef, ResolveError> {
        let mut resolved = match resp {
            ResponseOrRef::Ref { ref_path } => {
                let section = self.components.map(|c| &c.responses);
                lookup(section, ref_path, "responses", |r| r.as_inline().cloned())?
            }
            ResponseOrRef::Response(r) => r.clone(),
        };
        self.resolve_media_types(&mut resolved.content)?;
        Ok(ResponseOrRef::Response(resolved))
    }

    fn resolve_media_types(&mut self, content: &mut Content) -> Result<(), ResolveError> {
        for mt in content.values_mut() {
            if let Some(ref s) = mt.schema {
                mt.schema = Some(self.resolve_schema_or_ref(s)?);
            }
        }
        Ok(())
    }

    /// Look up a schema target. Aliases (`Foo: { $ref: Bar }`) come back as
    /// their `$ref` and are followed by the caller.
    fn lookup_schema(&self, ref_path: &str) -> Result<SchemaOrRef, ResolveError> {
        let section = self.components.map(|c| &c.schemas);
        lookup(section, ref_path, "schemas", |s| Some(s.clone()))
    }
}

fn lookup<T, U>(
    section: Option<&IndexMap<String, T>>,
    ref_path: &str,
    expected_section: &str,
    extract: impl Fn(&T) -> Option<U>,
) -> Result<U, ResolveError> {
    let name = parse_ref_name(ref_path, expected_section)?;
    section
        .and_then(|entries| entries.get(name.as_str()))
        .and_then(extract)
        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
}

/// The `$ref` pointer to a named component schema.
fn schema_pointer(name: &str) -> String {
    format!(
        "#/components/schemas/{}",
        name.replace('~', "~0").replace('/', "~1")
    )
}

/// Parse a `$ref` like `#/components/schemas/Foo` and extract the
/// (pointer-unescaped) name.
fn parse_ref_name(ref_path: &str, expected_section: &str) -> Result<String, ResolveError> {
    let invalid = || ResolveError::InvalidRefFormat(ref_path.to_string());
    let stripped = ref_path.strip_prefix("#/components/").ok_or_else(invalid)?;
    let (section, name) = stripped.split_once('/').ok_or_else(invalid)?;
    if section != expected_section || name.contains('/') {
        return Err(invalid());
    }
    Ok(name.replace("~1", "/").replace("~0", "~"))
}
