use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::parse::operation::{HttpMethod, Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterOrRef};
use crate::parse::content::{RequestBody, RequestBodyOrRef, Response, ResponseOrRef};
use crate::parse::server::Server;

/// One HTTP method on one path, with its parameters merged and its full
/// path (server base path included) computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedOperation {
    /// Base path plus route, e.g. `/v1/pets/{id}`.
    pub path: String,
    /// The path pattern as written under `paths`.
    pub route: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    #[serde(default)]
    pub deprecated: bool,
}

/// The path prefix contributed by the first server, without a trailing slash.
pub fn base_path(servers: &[Server]) -> String {
    let Some(server) = servers.first() else {
        return String::new();
    };
    let path = server.path_component();
    path.strip_suffix('/').unwrap_or(path).to_string()
}

/// Flatten `paths` into one record per operation, in document order.
pub fn flatten_operations(
    paths: &IndexMap<String, PathItem>,
    servers: &[Server],
) -> Vec<FlattenedOperation> {
    let base = base_path(servers);
    let mut operations = Vec::new();

    for (route, item) in paths {
        for (method, op) in &item.operations {
            operations.push(flatten_operation(&base, route, *method, op, &item.parameters));
        }
    }

    debug!("flattened {} operations", operations.len());
    operations
}

fn flatten_operation(
    base: &str,
    route: &str,
    method: HttpMethod,
    op: &Operation,
    shared: &[ParameterOrRef],
) -> FlattenedOperation {
    let request_body = op.request_body.as_ref().and_then(|body| match body {
        RequestBodyOrRef::RequestBody(body) => Some(body.clone()),
        RequestBodyOrRef::Ref { ref_path } => {
            warn!("{method} {route}: skipping unresolved request body {ref_path}");
            None
        }
    });

    let responses = op
        .responses
        .iter()
        .filter_map(|(status, response)| match response {
            ResponseOrRef::Response(r) => Some((status.clone(), r.clone())),
            ResponseOrRef::Ref { ref_path } => {
                warn!("{method} {route}: skipping unresolved response {ref_path}");
                None
            }
        })
        .collect();

    FlattenedOperation {
        path: format!("{base}{route}"),
        route: route.to_string(),
        method,
        operation_id: op.operation_id.clone(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        parameters: merge_parameters(&op.parameters, shared),
        request_body,
        responses,
        deprecated: op.deprecated.unwrap_or(false),
    }
}

/// Operation-level parameters, then the path-level ones the operation does
/// not redefine. A parameter is identified by `(name, in)`.
pub fn merge_parameters(own: &[ParameterOrRef], shared: &[ParameterOrRef]) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = inline_parameters(own).cloned().collect();
    let own_count = merged.len();

    for param in inline_parameters(shared) {
        if !merged[..own_count].iter().any(|p| p.same_slot(param)) {
            merged.push(param.clone());
        }
    }
    merged
}

fn inline_parameters(params: &[ParameterOrRef]) -> impl Iterator<Item = &Parameter> {
    params.iter().filter_map(|p| match p {
        ParameterOrRef::Parameter(p) => Some(p),
        ParameterOrRef::Ref { ref_path } => {
            warn!("skipping unresolved parameter {ref_path}");
            None
        }
    })
}

/// The client method name: the `operationId`, or `<method>_<path>` built
/// from the full path when there is none.
pub fn method_name(op: &FlattenedOperation) -> String {
    match &op.operation_id {
        Some(id) => id.clone(),
        None => fallback_method_name(op.method, &op.path),
    }
}

fn fallback_method_name(method: HttpMethod, path: &str) -> String {
    let path: String = path
        .trim_start_matches('/')
        .chars()
        .filter(|c| !matches!(c, '{' | '}'))
        .map(|c| if c == '/' { '_' } else { c })
        .collect();
    format!("{method}_{path}")
}
