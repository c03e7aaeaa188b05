//! Declarative configuration schemas.
//!
//! A [`Schema`] declares typed, named attributes. A [`Loader`] parses a
//! document, keeps the values the schema declares, and records an error for
//! every unknown key or missing required attribute. Values are stored raw
//! and converted to their declared type when read from the resulting
//! [`ConfigInstance`].
//!
//! [`define_config!`] generates a strongly typed wrapper with one getter and
//! setter per attribute.

pub mod config;
pub mod convert;
mod error;
mod macros;
pub mod schema;
pub mod value;

pub use config::{
    ConfigError, ConfigInstance, EnvTemplate, Loader, Parser, Preprocessor, TomlParser,
    YamlParser,
};
pub use convert::{Converters, Symbol, TypeTag, TypedValue};
pub use error::Error;
pub use schema::{AttributeDefinition, AttributeOptions, Declaration, Schema, SchemaBuilder, SchemaError};
pub use value::RawValue;
