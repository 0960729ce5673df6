use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Failure to turn a spec path into a self-contained document.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("remote references are not supported: {0}")]
    RemoteRef(String),
}

impl ResolveError {
    /// The document locator the failure points at, when there is one.
    pub fn locator(&self) -> Option<&str> {
        match self {
            ResolveError::Io { .. } | ResolveError::Parse { .. } => None,
            ResolveError::CircularRef(r)
            | ResolveError::InvalidRefFormat(r)
            | ResolveError::RefTargetNotFound(r)
            | ResolveError::RemoteRef(r) => Some(r),
        }
    }
}

/// A schema handed to the property projector had the wrong shape.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("{path}: `properties` must be a mapping")]
    PropertiesNotAMapping { path: String },

    #[error("{path}: invalid schema: {message}")]
    InvalidSchema { path: String, message: String },
}
