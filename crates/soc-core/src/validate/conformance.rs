//! Structural checks against the shape the OpenAPI 3.x schema requires.
//!
//! Checks run in document order and stop at the first failure, which is
//! reported with the locator of the offending node.

use std::path::Path;

use serde_json::{Map, Value};

use super::ValidationError;
use crate::error::ResolveError;
use crate::parse::{self, operation::HttpMethod, parameter::ParameterLocation, spec::OpenApiSpec};
use crate::resolve;

type CheckResult = Result<(), ValidationError>;

/// Load and bundle `path`, check its structure, and return the typed
/// bundled document (internal references still in place).
pub async fn check(path: &Path) -> Result<OpenApiSpec, ValidationError> {
    let bundled = resolve::bundle(path).await.map_err(|e| resolve_failure(&e))?;

    check_document(&bundled)?;

    let spec = parse::from_value(bundled).map_err(|e| ValidationError::error("spec", e.to_string()))?;
    resolve::dereference(&spec).map_err(|e| resolve_failure(&e))?;
    Ok(spec)
}

fn resolve_failure(error: &ResolveError) -> ValidationError {
    ValidationError::error(error.locator().unwrap_or("spec"), error.to_string())
}

/// Run the value-level checks on an already loaded document.
pub(crate) fn check_document(doc: &Value) -> CheckResult {
    let Some(root) = doc.as_object() else {
        return Err(ValidationError::error("spec", "document must be a mapping"));
    };
    check_version(root)?;
    check_info(root)?;
    check_paths(root)?;
    Ok(())
}

fn check_version(root: &Map<String, Value>) -> CheckResult {
    match root.get("openapi") {
        Some(Value::String(v)) if v.starts_with("3.") => Ok(()),
        Some(Value::String(v)) => Err(ValidationError::error(
            "openapi",
            format!("unsupported OpenAPI version '{v}', expected 3.x"),
        )),
        Some(_) => Err(ValidationError::error("openapi", "must be a string")),
        None => Err(ValidationError::error("openapi", "missing required field")),
    }
}

fn check_info(root: &Map<String, Value>) -> CheckResult {
    let Some(info) = root.get("info") else {
        return Err(ValidationError::error("info", "missing required field"));
    };
    let Some(info) = info.as_object() else {
        return Err(ValidationError::error("info", "must be a mapping"));
    };
    for field in ["title", "version"] {
        let locator = format!("info.{field}");
        match info.get(field) {
            Some(Value::String(_)) => {}
            Some(_) => return Err(ValidationError::error(locator, "must be a string")),
            None => return Err(ValidationError::error(locator, "missing required field")),
        }
    }
    Ok(())
}

fn check_paths(root: &Map<String, Value>) -> CheckResult {
    let Some(paths) = root.get("paths") else {
        return Ok(());
    };
    let Some(paths) = paths.as_object() else {
        return Err(ValidationError::error("paths", "must be a mapping"));
    };

    for (route, item) in paths {
        let locator = format!("paths.{route}");
        if !route.starts_with('/') {
            return Err(ValidationError::error(locator, "path must begin with '/'"));
        }
        let Some(item) = item.as_object() else {
            return Err(ValidationError::error(locator, "path item must be a mapping"));
        };
        check_parameters(item, &locator)?;

        for method in HttpMethod::ALL {
            if let Some(op) = item.get(method.as_str()) {
                check_operation(op, &format!("{locator}.{method}"))?;
            }
        }
    }
    Ok(())
}

fn check_operation(op: &Value, locator: &str) -> CheckResult {
    let Some(op) = op.as_object() else {
        return Err(ValidationError::error(locator, "operation must be a mapping"));
    };
    check_parameters(op, locator)?;

    let responses_locator = format!("{locator}.responses");
    let responses = match op.get("responses") {
        Some(Value::Object(r)) if !r.is_empty() => r,
        Some(Value::Object(_)) => {
            return Err(ValidationError::error(
                responses_locator,
                "at least one response is required",
            ));
        }
        Some(_) => return Err(ValidationError::error(responses_locator, "must be a mapping")),
        None => {
            return Err(ValidationError::error(
                responses_locator,
                "missing required field",
            ));
        }
    };

    for (status, response) in responses {
        let locator = format!("{responses_locator}.{status}");
        let Some(response) = response.as_object() else {
            return Err(ValidationError::error(locator, "response must be a mapping"));
        };
        if response.contains_key("$ref") {
            continue;
        }
        if !matches!(response.get("description"), Some(Value::String(_))) {
            return Err(ValidationError::error(
                locator,
                "response must have a string 'description'",
            ));
        }
    }
    Ok(())
}

fn check_parameters(owner: &Map<String, Value>, locator: &str) -> CheckResult {
    let Some(parameters) = owner.get("parameters") else {
        return Ok(());
    };
    let Some(parameters) = parameters.as_array() else {
        return Err(ValidationError::error(
            format!("{locator}.parameters"),
            "must be a sequence",
        ));
    };

    for (i, parameter) in parameters.iter().enumerate() {
        let locator = format!("{locator}.parameters[{i}]");
        let Some(parameter) = parameter.as_object() else {
            return Err(ValidationError::error(locator, "parameter must be a mapping"));
        };
        if parameter.contains_key("$ref") {
            continue;
        }
        if !matches!(parameter.get("name"), Some(Value::String(_))) {
            return Err(ValidationError::error(locator, "parameter must have a string 'name'"));
        }
        let location = parameter
            .get("in")
            .and_then(Value::as_str)
            .and_then(ParameterLocation::from_name);
        let Some(location) = location else {
            return Err(ValidationError::error(
                locator,
                "parameter 'in' must be one of query, header, path, cookie",
            ));
        };
        if location == ParameterLocation::Path && parameter.get("required") != Some(&Value::Bool(true)) {
            return Err(ValidationError::error(
                locator,
                "path parameters must be required",
            ));
        }
    }
    Ok(())
}
