pub mod name_normalizer;
pub mod operations;
pub mod properties;

pub use operations::{FlattenedOperation, base_path, flatten_operations, method_name};
pub use properties::{PropertyDescriptor, project};
