mod bundle;

use std::path::Path;

use log::debug;

pub use bundle::bundle;

use crate::error::ResolveError;
use crate::parse::{self, ref_resolve::RefResolver, spec::OpenApiSpec};

/// Load the document at `path` and return it with every reference under
/// `paths` and `components` replaced by its target.
pub async fn resolve(path: &Path) -> Result<OpenApiSpec, ResolveError> {
    let bundled = bundle(path).await?;
    let spec = parse::from_value(bundled).map_err(|source| ResolveError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let resolved = dereference(&spec)?;
    debug!(
        "resolved {} ({} paths, {} schemas)",
        path.display(),
        resolved.paths.len(),
        resolved.schemas().count()
    );
    Ok(resolved)
}

/// Replace internal `#/components/...` references in an already bundled document.
pub fn dereference(spec: &OpenApiSpec) -> Result<OpenApiSpec, ResolveError> {
    RefResolver::new(spec).resolve_spec(spec)
}
