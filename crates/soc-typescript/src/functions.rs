//! Template functions for one render call.
//!
//! Template values are converted into the typed document model on the way
//! in; a value of the wrong shape becomes a template error that names the
//! function it was passed to.

use std::sync::Arc;

use indexmap::IndexMap;
use minijinja::{Environment, Error, ErrorKind, State, Value};
use serde::de::DeserializeOwned;

use soc_core::helpers::{self, Helpers};
use soc_core::parse::content::{APPLICATION_JSON, RequestBody, Response};
use soc_core::parse::operation::PathItem;
use soc_core::parse::parameter::{Parameter, ParameterLocation};
use soc_core::parse::schema::SchemaOrRef;
use soc_core::parse::server::Server;
use soc_core::transform::properties::{
    self, PropertyDescriptor, form_url_encoded_properties, multipart_form_data_properties,
};
use soc_core::transform::{FlattenedOperation, flatten_operations, method_name};

use crate::type_mapper::{NamedSchemas, alias_to_ts, property_key, schema_to_ts, type_name};

/// Register the document helpers and the TypeScript-specific functions.
/// `names` lets type expressions refer to component schemas by name.
pub fn register(env: &mut Environment<'static>, naming: Helpers, names: Arc<NamedSchemas>) {
    env.add_function("methods", methods);
    env.add_function("method_name", |op: Value| -> Result<String, Error> {
        Ok(method_name(&typed::<FlattenedOperation>("method_name", &op)?))
    });
    env.add_function("properties", |schema: Value| -> Result<Value, Error> {
        let json = to_json("properties", &schema)?;
        let descriptors = properties::project_value(&json, "properties")
            .map_err(|e| invalid("properties", e))?;
        Ok(Value::from_serialize(&descriptors))
    });
    env.add_function("js", move |name: String| naming.js(&name));
    env.add_function("json", |body: Value| -> Result<Value, Error> {
        let body = request_body("json", &body)?;
        Ok(Value::from_serialize(body.as_ref().and_then(helpers::json)))
    });
    env.add_function("is_multipart_form_data", |body: Value| -> Result<bool, Error> {
        let body = request_body("is_multipart_form_data", &body)?;
        Ok(body.as_ref().is_some_and(helpers::is_multipart_form_data))
    });
    env.add_function("is_form_url_encoded", |body: Value| -> Result<bool, Error> {
        let body = request_body("is_form_url_encoded", &body)?;
        Ok(body.as_ref().is_some_and(helpers::is_form_url_encoded))
    });
    env.add_function("multipart_form_data_properties", |body: Value| -> Result<Value, Error> {
        let body = request_body("multipart_form_data_properties", &body)?;
        let props = body.as_ref().map(multipart_form_data_properties).unwrap_or_default();
        Ok(Value::from_serialize(&props))
    });
    env.add_function("form_url_encoded_properties", |body: Value| -> Result<Value, Error> {
        let body = request_body("form_url_encoded_properties", &body)?;
        let props = body.as_ref().map(form_url_encoded_properties).unwrap_or_default();
        Ok(Value::from_serialize(&props))
    });
    env.add_function("status_codes", |responses: Value| -> Result<Value, Error> {
        let responses = typed::<IndexMap<String, Response>>("status_codes", &responses)?;
        Ok(Value::from_serialize(helpers::status_codes(&responses)))
    });
    env.add_function("has_default", |responses: Value| -> Result<bool, Error> {
        let responses = typed::<IndexMap<String, Response>>("has_default", &responses)?;
        Ok(helpers::has_default(&responses))
    });

    let types = names.clone();
    env.add_function("ts_type", move |schema: Value| -> Result<String, Error> {
        let schema = typed::<Option<SchemaOrRef>>("ts_type", &schema)?;
        Ok(schema
            .as_ref()
            .map_or_else(|| "unknown".to_string(), |s| schema_to_ts(s, &types)))
    });
    let types = names.clone();
    env.add_function("ts_alias", move |schema: Value| -> Result<String, Error> {
        let schema = typed::<SchemaOrRef>("ts_alias", &schema)?;
        Ok(alias_to_ts(&schema, &types))
    });
    env.add_function("ts_name", type_name);
    env.add_function("property_key", property_key);
    let types = names.clone();
    env.add_function("body_type", move |body: Value| -> Result<String, Error> {
        let body = request_body("body_type", &body)?;
        Ok(body.map_or_else(|| "undefined".to_string(), |b| body_type(&b, naming, &types)))
    });
    env.add_function("success_type", move |responses: Value| -> Result<String, Error> {
        let responses = typed::<IndexMap<String, Response>>("success_type", &responses)?;
        Ok(success_type(&responses, &names))
    });
    env.add_function("param_key", move |params: Value, param: Value| -> Result<String, Error> {
        let params = typed::<Vec<Parameter>>("param_key", &params)?;
        let param = typed::<Parameter>("param_key", &param)?;
        Ok(param_key(&params, &param, naming))
    });
    env.add_function("path_expr", move |path: String, params: Value| -> Result<String, Error> {
        let params = typed::<Vec<Parameter>>("path_expr", &params)?;
        Ok(path_expr(&path, &params, naming))
    });
    env.add_function("server_origin", server_origin);

    env.add_filter("json_string", |value: Value| -> Result<String, Error> {
        serde_json::to_string(&value).map_err(|e| invalid("json_string", e))
    });
}

/// `methods(paths)`: the flattened operations, using `servers` from the
/// render context for the base path.
fn methods(state: &State, paths: Value) -> Result<Value, Error> {
    let paths = typed::<IndexMap<String, PathItem>>("methods", &paths)?;
    let servers = servers(state)?;
    Ok(Value::from_serialize(flatten_operations(&paths, &servers)))
}

/// `server_origin()`: scheme and authority of the first server.
fn server_origin(state: &State) -> Result<String, Error> {
    let servers = servers(state)?;
    Ok(servers.first().map(|s| origin(&s.url).to_string()).unwrap_or_default())
}

fn servers(state: &State) -> Result<Vec<Server>, Error> {
    match state.lookup("servers") {
        Some(value) => Ok(typed::<Option<Vec<Server>>>("servers", &value)?.unwrap_or_default()),
        None => Ok(Vec::new()),
    }
}

fn request_body(helper: &str, value: &Value) -> Result<Option<RequestBody>, Error> {
    typed(helper, value)
}

fn to_json(helper: &str, value: &Value) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|e| invalid(helper, e))
}

fn typed<T: DeserializeOwned>(helper: &str, value: &Value) -> Result<T, Error> {
    serde_json::from_value(to_json(helper, value)?).map_err(|e| invalid(helper, e))
}

fn invalid(helper: &str, err: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::InvalidOperation, format!("{helper}: {err}"))
}

/// The argument type for a request body: the JSON schema's type, or an
/// object of the form fields.
fn body_type(body: &RequestBody, naming: Helpers, names: &NamedSchemas) -> String {
    if helpers::is_multipart_form_data(body) {
        return fields_type(&multipart_form_data_properties(body), naming, names);
    }
    if helpers::is_form_url_encoded(body) {
        return fields_type(&form_url_encoded_properties(body), naming, names);
    }
    body.schema_for(APPLICATION_JSON)
        .map_or_else(|| "unknown".to_string(), |s| schema_to_ts(s, names))
}

fn fields_type(props: &[PropertyDescriptor], naming: Helpers, names: &NamedSchemas) -> String {
    if props.is_empty() {
        return "Record<string, unknown>".to_string();
    }
    let fields: Vec<String> = props
        .iter()
        .map(|p| {
            let optional = if p.is_required { "" } else { "?" };
            format!("{}{optional}: {}", naming.js(&p.name), schema_to_ts(&p.schema, names))
        })
        .collect();
    format!("{{ {} }}", fields.join("; "))
}

/// The JSON type of the first 2xx response, or `void`.
fn success_type(responses: &IndexMap<String, Response>, names: &NamedSchemas) -> String {
    responses
        .iter()
        .filter(|(status, _)| status.starts_with('2'))
        .find_map(|(_, response)| response.json_schema())
        .map_or_else(|| "void".to_string(), |s| schema_to_ts(s, names))
}

/// The field of the `params` argument that carries `param`. Names shared by
/// parameters in different locations get the location appended.
fn param_key(params: &[Parameter], param: &Parameter, naming: Helpers) -> String {
    let key = naming.js(&param.name);
    let clashes = params
        .iter()
        .any(|other| other.location != param.location && naming.js(&other.name) == key);
    if clashes {
        naming.js(&format!("{}_{}", param.name, param.location.as_str()))
    } else {
        key
    }
}

/// A TypeScript template literal for `path`, with `{name}` segments read
/// from `params`.
fn path_expr(path: &str, params: &[Parameter], naming: Helpers) -> String {
    let mut out = String::from("`");
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = &rest[open + 1..close];
        let key = params
            .iter()
            .find(|p| p.location == ParameterLocation::Path && p.name == name)
            .map_or_else(|| naming.js(name), |p| param_key(params, p, naming));
        out.push_str(&format!("${{encodeURIComponent(String(params.{key}))}}"));
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    out.push('`');
    out
}

/// Scheme and authority of an absolute server URL; empty for relative ones.
fn origin(url: &str) -> &str {
    let Some(idx) = url.find("://") else {
        return "";
    };
    let authority = idx + 3;
    let end = url[authority..]
        .find(['/', '?', '#'])
        .map_or(url.len(), |i| authority + i);
    &url[..end]
}
