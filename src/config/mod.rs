//! Configuration loading: preprocessing, parsing and populating instances.

mod error;
mod instance;
mod loader;
mod parser;
mod template;

pub use error::ConfigError;
pub use instance::{ConfigInstance, FromTypedValue};
pub use loader::Loader;
pub use parser::{Document, Parser, TomlParser, YamlParser};
pub use template::{EnvTemplate, Preprocessor};
