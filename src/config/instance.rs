use std::collections::HashMap;
use std::sync::Arc;

use crate::convert::{Converters, Symbol, TypedValue};
use crate::schema::{AttributeDefinition, Schema};
use crate::value::RawValue;

use super::ConfigError;

/// Extraction of a concrete Rust type from a [`TypedValue`].
pub trait FromTypedValue: Sized {
    /// Name used in mismatch errors.
    const EXPECTED: &'static str;

    fn from_typed_value(value: TypedValue) -> Option<Self>;
}

impl FromTypedValue for String {
    const EXPECTED: &'static str = "string";

    fn from_typed_value(value: TypedValue) -> Option<Self> {
        match value {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromTypedValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_typed_value(value: TypedValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FromTypedValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_typed_value(value: TypedValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromTypedValue for Symbol {
    const EXPECTED: &'static str = "symbol";

    fn from_typed_value(value: TypedValue) -> Option<Self> {
        match value {
            TypedValue::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

impl FromTypedValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_typed_value(value: TypedValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromTypedValue for TypedValue {
    const EXPECTED: &'static str = "any";

    fn from_typed_value(value: TypedValue) -> Option<Self> {
        Some(value)
    }
}

/// A loaded configuration: raw attribute values plus the errors collected
/// while loading them.
///
/// Values are stored exactly as the document provided them and converted to
/// the declared type on every read.
#[derive(Debug, Clone)]
pub struct ConfigInstance {
    schema: Arc<Schema>,
    converters: Arc<Converters>,
    attributes: HashMap<String, RawValue>,
    errors: Vec<String>,
}

impl ConfigInstance {
    /// Creates an empty instance using the standard converters.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_converters(schema, Converters::standard())
    }

    pub fn with_converters(schema: Arc<Schema>, converters: Arc<Converters>) -> Self {
        Self {
            schema,
            converters,
            attributes: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Raw values keyed by attribute name.
    pub fn attributes(&self) -> &HashMap<String, RawValue> {
        &self.attributes
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns `true` if no errors have been recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub(crate) fn push_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub(crate) fn insert_raw(&mut self, name: String, value: RawValue) {
        self.attributes.insert(name, value);
    }

    /// Checks every declared attribute against its definition, appending
    /// an error for each required attribute without a value or default.
    ///
    /// Returns [`is_valid`](Self::is_valid) afterwards.
    pub fn validate(&mut self) -> bool {
        let schema = Arc::clone(&self.schema);
        for definition in schema.iter() {
            if let Some(error) = definition.validate(self.attributes.get(definition.name())) {
                tracing::warn!(attribute = definition.name(), "missing required attribute");
                self.errors.push(error);
            }
        }
        self.is_valid()
    }

    fn definition(&self, name: &str) -> Result<&AttributeDefinition, ConfigError> {
        self.schema
            .get(name)
            .ok_or_else(|| ConfigError::UnknownAttribute(name.to_string()))
    }

    /// The stored raw value, or `None` if the attribute was never set.
    pub fn raw(&self, name: &str) -> Option<&RawValue> {
        self.attributes.get(name)
    }

    /// Reads an attribute converted to its declared type.
    ///
    /// An unset attribute converts as nil. Declared defaults only satisfy
    /// the required check; they are never substituted on read.
    pub fn get(&self, name: &str) -> Result<TypedValue, ConfigError> {
        let definition = self.definition(name)?;
        let nil = RawValue::Nil;
        let raw = self.attributes.get(name).unwrap_or(&nil);

        self.converters
            .convert(definition.type_tag(), raw)
            .ok_or_else(|| ConfigError::NoConverter {
                attribute: name.to_string(),
                type_tag: definition.type_tag().clone(),
            })
    }

    /// Reads an attribute and extracts it as `T`.
    ///
    /// Fails with [`ConfigError::TypeMismatch`] if the declared type's
    /// converter does not produce a `T`.
    pub fn get_as<T: FromTypedValue>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self.get(name)?;
        T::from_typed_value(value).ok_or_else(|| ConfigError::TypeMismatch {
            attribute: name.to_string(),
            declared: self
                .schema
                .get(name)
                .map(|d| d.type_tag().clone())
                .unwrap_or_default(),
            requested: T::EXPECTED,
        })
    }

    pub fn get_string(&self, name: &str) -> Result<String, ConfigError> {
        self.get_as(name)
    }

    pub fn get_integer(&self, name: &str) -> Result<i64, ConfigError> {
        self.get_as(name)
    }

    pub fn get_float(&self, name: &str) -> Result<f64, ConfigError> {
        self.get_as(name)
    }

    pub fn get_symbol(&self, name: &str) -> Result<Symbol, ConfigError> {
        self.get_as(name)
    }

    /// Stores a raw value for a declared attribute. No validation or
    /// conversion happens here.
    pub fn set(&mut self, name: &str, value: impl Into<RawValue>) -> Result<(), ConfigError> {
        self.definition(name)?;
        self.attributes.insert(name.to_string(), value.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TypeTag;
    use crate::schema::AttributeOptions;

    fn schema() -> Arc<Schema> {
        let mut builder = Schema::builder();
        builder
            .attribute("name", ("Service name", AttributeOptions::new().required(true)))
            .unwrap();
        builder
            .attribute(
                "port",
                AttributeOptions::new()
                    .required(true)
                    .of_type(TypeTag::INTEGER)
                    .default(80),
            )
            .unwrap();
        builder
            .attribute("ratio", AttributeOptions::new().of_type(TypeTag::FLOAT))
            .unwrap();
        builder
            .attribute(
                "log_level",
                AttributeOptions::new().of_type(TypeTag::SYMBOL).default("debug"),
            )
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_set_and_get_typed() {
        let mut config = ConfigInstance::new(schema());
        config.set("name", "svc").unwrap();
        config.set("port", "8080").unwrap();
        config.set("ratio", "0.75").unwrap();

        assert_eq!(config.get_string("name").unwrap(), "svc");
        assert_eq!(config.get_integer("port").unwrap(), 8080);
        assert_eq!(config.get_float("ratio").unwrap(), 0.75);
        assert_eq!(config.raw("port"), Some(&RawValue::from("8080")));
    }

    #[test]
    fn test_unset_reads_as_nil_not_default() {
        let mut config = ConfigInstance::new(schema());
        assert_eq!(config.get_integer("port").unwrap(), 0);
        assert_eq!(config.get_symbol("log_level").unwrap(), "");
        assert_eq!(config.get_string("name").unwrap(), "");
        assert_eq!(config.get_float("ratio").unwrap(), 0.0);

        config.set("port", RawValue::Nil).unwrap();
        assert_eq!(config.get_integer("port").unwrap(), 0);
        config.set("port", "").unwrap();
        assert_eq!(config.get_integer("port").unwrap(), 0);

        // the default still satisfies the required check
        config.set("name", "svc").unwrap();
        assert!(config.validate());
    }

    #[test]
    fn test_malformed_integer_reads_zero() {
        let mut config = ConfigInstance::new(schema());
        config.set("port", "not-a-number").unwrap();
        assert_eq!(config.get_integer("port").unwrap(), 0);
    }

    #[test]
    fn test_set_is_unchecked_for_declared_names() {
        let mut config = ConfigInstance::new(schema());
        config.set("port", vec!["a", "b"]).unwrap();
        assert_eq!(config.raw("port"), Some(&RawValue::from(vec!["a", "b"])));
        assert!(config.is_valid());
    }

    #[test]
    fn test_unknown_attribute() {
        let mut config = ConfigInstance::new(schema());
        assert!(matches!(config.get("nope"), Err(ConfigError::UnknownAttribute(_))));
        assert!(matches!(config.set("nope", 1), Err(ConfigError::UnknownAttribute(_))));
        assert!(config.attributes().is_empty());
    }

    #[test]
    fn test_type_mismatch() {
        let config = ConfigInstance::new(schema());
        let err = config.get_integer("name").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TypeMismatch { ref declared, requested: "integer", .. } if *declared == TypeTag::STRING
        ));
    }

    #[test]
    fn test_missing_converter() {
        let mut builder = Schema::builder();
        builder
            .attribute("enabled", AttributeOptions::new().of_type(TypeTag::new("boolean")))
            .unwrap();
        let config = ConfigInstance::new(builder.build());
        assert!(matches!(config.get("enabled"), Err(ConfigError::NoConverter { .. })));
    }

    #[test]
    fn test_validate_and_clear_errors() {
        let mut config = ConfigInstance::new(schema());
        assert!(!config.validate());
        assert_eq!(config.errors(), ["name is a required attribute"]);

        config.clear_errors();
        assert!(config.is_valid());

        config.set("name", "svc").unwrap();
        assert!(config.validate());
    }
}
