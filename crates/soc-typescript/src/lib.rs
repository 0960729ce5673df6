pub mod functions;
pub mod generator;
pub mod type_mapper;

pub use generator::{TypeScriptError, TypeScriptModel};
