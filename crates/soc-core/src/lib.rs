pub mod config;
pub mod error;
pub mod helpers;
pub mod model;
pub mod options;
pub mod parse;
pub mod resolve;
pub mod transform;
pub mod validate;

pub use model::{ApiModel, LanguageModel, generate, read_spec};

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
