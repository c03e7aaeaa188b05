use std::path::PathBuf;
use thiserror::Error;

use crate::convert::TypeTag;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("file {0} does not exist")]
    FileNotFound(PathBuf),

    #[error("file {path} is not readable: {source}")]
    FileNotReadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document root must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("{switch} must be true or false, got {value}")]
    InvalidSwitch { switch: &'static str, value: String },

    #[error("unclosed reference (missing '}}')")]
    UnclosedReference,

    #[error("invalid variable reference: ${{{0}}}")]
    InvalidReference(String),

    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("{0} is not a declared attribute")]
    UnknownAttribute(String),

    #[error("no converter registered for type '{type_tag}' of attribute '{attribute}'")]
    NoConverter { attribute: String, type_tag: TypeTag },

    #[error("attribute '{attribute}' is declared as {declared}, not {requested}")]
    TypeMismatch {
        attribute: String,
        declared: TypeTag,
        requested: &'static str,
    },
}
