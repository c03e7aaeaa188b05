//! Structured-text parsers producing raw key/value documents.

use crate::value::RawValue;

use super::ConfigError;

/// Top-level entries of a parsed document, in the order the format yields them.
pub type Document = Vec<(String, RawValue)>;

/// Turns document text into a key/value mapping of raw values.
pub trait Parser: Send + Sync + std::fmt::Debug {
    fn parse(&self, text: &str) -> Result<Document, ConfigError>;
}

/// Parses TOML documents. The default parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlParser;

impl Parser for TomlParser {
    fn parse(&self, text: &str) -> Result<Document, ConfigError> {
        let value: RawValue = toml::from_str(text)?;
        into_document(value)
    }
}

/// Parses YAML documents. An empty document parses as an empty mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl Parser for YamlParser {
    fn parse(&self, text: &str) -> Result<Document, ConfigError> {
        let value: RawValue = serde_yaml::from_str(text)?;
        into_document(value)
    }
}

fn into_document(value: RawValue) -> Result<Document, ConfigError> {
    match value {
        RawValue::Mapping(entries) => Ok(entries),
        RawValue::Nil => Ok(Document::new()),
        other => Err(ConfigError::NotAMapping(other.kind())),
    }
}
