mod conformance;
mod default_props;

use std::fmt;
use std::path::Path;

use log::debug;
use serde::Serialize;

pub use conformance::check;
pub use default_props::find_default_properties;

/// How serious a diagnostic is. Any `Error` blocks generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found in a document, located by a dotted path from the root
/// (`components.schemas.Pet.properties.default`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate the document at `path`.
///
/// Runs the structural conformance checks first and returns their single
/// failure if there is one. Otherwise scans the bundled document for
/// properties named `default` and returns every occurrence.
pub async fn validate(path: &Path) -> Vec<ValidationError> {
    let spec = match check(path).await {
        Ok(spec) => spec,
        Err(error) => {
            debug!("conformance failed at {}", error.path);
            return vec![error];
        }
    };
    let errors = find_default_properties(&spec);
    debug!("{} default-named properties in {}", errors.len(), path.display());
    errors
}

/// True when any diagnostic should stop generation.
pub fn has_errors(errors: &[ValidationError]) -> bool {
    errors.iter().any(ValidationError::is_error)
}
