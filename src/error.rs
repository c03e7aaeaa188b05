use crate::config::ConfigError;
use crate::schema::SchemaError;
use thiserror::Error;

/// Top-level error type for the configit library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
