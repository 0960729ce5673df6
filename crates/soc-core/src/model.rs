use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::GeneratedFile;
use crate::error::ResolveError;
use crate::options::{GenerationOptions, resolve_options};
use crate::parse::spec::OpenApiSpec;
use crate::resolve::resolve;
use crate::transform::{FlattenedOperation, flatten_operations};

/// What a language model renders: the dereferenced document with its
/// fields at the top level, plus the run's options under `options`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiModel {
    #[serde(flatten)]
    pub spec: OpenApiSpec,
    pub options: GenerationOptions,
}

impl ApiModel {
    pub fn new(spec: OpenApiSpec, options: GenerationOptions) -> Self {
        Self { spec, options }
    }

    /// The flattened operation list. Computed on every call.
    pub fn operations(&self) -> Vec<FlattenedOperation> {
        flatten_operations(&self.spec.paths, &self.spec.servers)
    }
}

/// Resolve the document at `spec_path` and pair it with the resolved options.
pub async fn read_spec(
    spec_path: &Path,
    options: &GenerationOptions,
) -> Result<ApiModel, ResolveError> {
    let spec = resolve(spec_path).await?;
    let options = resolve_options(spec_path, options);
    debug!("model ready for {}", options.name());
    Ok(ApiModel::new(spec, options))
}

/// A target language: optional model preparation, then rendering.
pub trait LanguageModel {
    type Error: std::error::Error;

    /// Add language-specific fields to the model before rendering.
    fn prepare_model(&self, _model: &mut ApiModel) {}

    fn render(&self, model: &ApiModel) -> Result<Vec<GeneratedFile>, Self::Error>;
}

/// Prepare `model` for `language` and render it.
pub fn generate<L: LanguageModel>(
    language: &L,
    mut model: ApiModel,
) -> Result<Vec<GeneratedFile>, L::Error> {
    language.prepare_model(&mut model);
    language.render(&model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    struct Listing;

    impl LanguageModel for Listing {
        type Error = std::fmt::Error;

        fn prepare_model(&self, model: &mut ApiModel) {
            model.options.package_name = Some(model.options.qualified_name());
        }

        fn render(&self, model: &ApiModel) -> Result<Vec<GeneratedFile>, Self::Error> {
            let names: Vec<_> = model
                .operations()
                .iter()
                .map(crate::transform::method_name)
                .collect();
            Ok(vec![GeneratedFile {
                path: format!("{}.txt", model.options.package_name.as_deref().unwrap_or_default()),
                content: names.join("\n"),
            }])
        }
    }

    #[test]
    fn test_generate_prepares_then_renders() {
        let spec = parse::from_yaml(
            r#"
openapi: 3.0.3
info: { title: T, version: "1" }
paths:
  /pets:
    get:
      operationId: listPets
      responses: { "200": { description: ok } }
    delete:
      responses: { "204": { description: gone } }
"#,
        )
        .unwrap();
        let options = resolve_options(Path::new("pets.yaml"), &GenerationOptions::default());
        let files = generate(&Listing, ApiModel::new(spec, options)).unwrap();
        assert_eq!(files[0].path, "pets-client.txt");
        assert_eq!(files[0].content, "listPets\ndelete_pets");
    }

    #[test]
    fn test_model_serializes_flat() {
        let spec = parse::from_yaml("openapi: 3.0.3\ninfo: { title: T, version: '1' }\npaths: {}").unwrap();
        let value = serde_json::to_value(ApiModel::new(spec, GenerationOptions::default())).unwrap();
        assert_eq!(value["info"]["title"], "T");
        assert_eq!(value["openapi"], "3.0.3");
        assert!(value["options"].is_object());
    }
}
