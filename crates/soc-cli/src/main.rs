use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;
use tokio::fs;

use soc_core::config::{self, CONFIG_FILE_NAME, Language, SocConfig};
use soc_core::options::GenerationOptions;
use soc_core::validate::{self, ValidationError};
use soc_core::{GeneratedFile, generate, read_spec};
use soc_typescript::TypeScriptModel;

#[derive(Parser)]
#[command(
    name = "small-openapi-codegen",
    about = "Typed API clients from OpenAPI 3.x documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a client from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI spec file (YAML or JSON); defaults to `input` in the config
        spec: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target language
        #[arg(short, long)]
        language: Option<LanguageArg>,

        /// Client name, used for the package name
        #[arg(long)]
        name: Option<String>,

        /// Name of the generated client class
        #[arg(long)]
        class_name: Option<String>,

        /// Package namespace, e.g. `@acme`
        #[arg(long)]
        namespace: Option<String>,

        /// snake_case identifiers instead of camelCase
        #[arg(long)]
        snake: bool,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file
        spec: PathBuf,
    },

    /// Initialize a new configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    #[value(name = "ts", alias = "typescript")]
    TypeScript,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::TypeScript => Language::TypeScript,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            spec,
            output,
            language,
            name,
            class_name,
            namespace,
            snake,
        } => {
            let flags = GenerationOptions {
                namespace,
                name,
                class_name,
                snake,
                ..Default::default()
            };
            cmd_generate(spec, output, language.map(Language::from), flags).await
        }

        Commands::Validate { spec } => cmd_validate(&spec).await,

        Commands::Init { force } => cmd_init(force).await,

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "small-openapi-codegen",
                &mut std::io::stdout(),
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SocConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Print validation diagnostics to stderr. Returns true when any is an error.
fn report(errors: &[ValidationError]) -> bool {
    if !validate::has_errors(errors) {
        for warning in errors {
            eprintln!("warning: {warning}");
        }
        return false;
    }
    eprintln!("OpenAPI specification validation failed:");
    for error in errors {
        eprintln!("- {}: {}", error.path, error.message);
    }
    true
}

/// Write generated files to disk under the given base directory.
async fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

async fn cmd_generate(
    spec: Option<PathBuf>,
    output: Option<PathBuf>,
    language: Option<Language>,
    flags: GenerationOptions,
) -> Result<ExitCode> {
    let cfg = try_load_config()?.unwrap_or_default();
    let spec = spec
        .or_else(|| cfg.input.as_ref().map(PathBuf::from))
        .context("no spec given and no `input` in the config file")?;
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let language = language.unwrap_or(cfg.language);
    let options = cfg.options.merged_with(&flags);

    if report(&validate::validate(&spec).await) {
        return Ok(ExitCode::FAILURE);
    }

    let model = read_spec(&spec, &options)
        .await
        .with_context(|| format!("failed to resolve {}", spec.display()))?;
    debug!("generating {} client {}", language.as_str(), model.options.name());

    let files = match language {
        Language::TypeScript => generate(&TypeScriptModel, model)?,
    };

    eprintln!("Generating {} → {}", language.as_str(), output.display());
    fs::create_dir_all(&output)
        .await
        .with_context(|| format!("failed to create output directory {}", output.display()))?;
    write_files(&output, &files).await?;
    eprintln!("Generated {} files in {}", files.len(), output.display());
    Ok(ExitCode::SUCCESS)
}

async fn cmd_validate(spec: &Path) -> Result<ExitCode> {
    let errors = validate::validate(spec).await;
    if report(&errors) {
        return Ok(ExitCode::FAILURE);
    }
    eprintln!("{} is valid.", spec.display());
    Ok(ExitCode::SUCCESS)
}

async fn cmd_init(force: bool) -> Result<ExitCode> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if fs::try_exists(&config_path).await? && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content()).await?;
    eprintln!("Created {}", config_path.display());
    Ok(ExitCode::SUCCESS)
}
