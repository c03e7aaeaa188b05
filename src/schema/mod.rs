//! Attribute definitions and the per-config schema registry.

mod attribute;
mod builder;
mod error;
mod registry;

pub use attribute::{AttributeDefinition, AttributeOptions, Declaration};
pub use builder::SchemaBuilder;
pub use error::SchemaError;
pub use registry::Schema;
