pub mod config;
pub mod tool;

pub use config::{Config, OntologyConfig, RegistryConfig};
pub use tool::{AnnotationTerm, OperationGroup, ToolRecord};
