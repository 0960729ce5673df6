use std::sync::Arc;

use log::debug;
use minijinja::Environment;
use soc_core::helpers::Helpers;
use soc_core::options::GenerationOptions;
use soc_core::transform::name_normalizer::service_name;
use soc_core::{ApiModel, GeneratedFile, LanguageModel};
use thiserror::Error;

use crate::functions;
use crate::type_mapper::NamedSchemas;

#[derive(Debug, Error)]
pub enum TypeScriptError {
    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),
}

/// Templates that produce a file, with the path they are written to.
const OUTPUTS: [(&str, &str); 3] = [
    ("package.json.j2", "package.json"),
    ("index.ts.j2", "src/index.ts"),
    ("tsconfig.json.j2", "tsconfig.json"),
];

/// Templates only pulled in by `include`.
const PARTIALS: [(&str, &str); 2] = [
    ("schema.ts.j2", include_str!("../templates/schema.ts.j2")),
    ("method.ts.j2", include_str!("../templates/method.ts.j2")),
];

/// TypeScript client: a fetch-based class with one method per operation.
pub struct TypeScriptModel;

impl LanguageModel for TypeScriptModel {
    type Error = TypeScriptError;

    fn prepare_model(&self, model: &mut ApiModel) {
        let options = &mut model.options;
        options.package_name = Some(options.qualified_name());
        options.service_name = Some(service_name(options.name()).to_string());
    }

    fn render(&self, model: &ApiModel) -> Result<Vec<GeneratedFile>, Self::Error> {
        let names = NamedSchemas::new(model.spec.schemas());
        let env = environment(&model.options, names)?;
        OUTPUTS
            .iter()
            .map(|(template, path)| {
                debug!("rendering {path}");
                let content = env.get_template(template)?.render(model)?;
                Ok(GeneratedFile {
                    path: path.to_string(),
                    content,
                })
            })
            .collect()
    }
}

/// A fresh environment for one render, with helpers bound to `options`.
pub fn environment(
    options: &GenerationOptions,
    names: NamedSchemas,
) -> Result<Environment<'static>, TypeScriptError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    env.add_template("package.json.j2", include_str!("../templates/package.json.j2"))?;
    env.add_template("index.ts.j2", include_str!("../templates/index.ts.j2"))?;
    env.add_template("tsconfig.json.j2", include_str!("../templates/tsconfig.json.j2"))?;
    for (name, source) in PARTIALS {
        env.add_template(name, source)?;
    }

    functions::register(&mut env, Helpers::new(options), Arc::new(names));
    Ok(env)
}
