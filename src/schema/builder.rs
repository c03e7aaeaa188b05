use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Parser;
use crate::value::RawValue;
use crate::Error;

use super::{AttributeDefinition, AttributeOptions, Declaration, Schema, SchemaError};

/// Append-only builder for a [`Schema`].
///
/// Attributes are declared one at a time; names must be unique. Once
/// [`build`](Self::build) is called the schema is frozen.
///
/// ## Example
///
/// ```
/// use configit::{AttributeOptions, Schema, TypeTag};
///
/// let mut builder = Schema::builder();
/// builder.attribute("name", ("The name of the service", AttributeOptions::new().required(true)))?;
/// builder.attribute(
///     "port",
///     AttributeOptions::new().required(true).of_type(TypeTag::INTEGER).default(80),
/// )?;
/// builder.attribute("log_level", AttributeOptions::new().of_type(TypeTag::SYMBOL).default("debug"))?;
///
/// let schema = builder.build();
/// assert_eq!(schema.len(), 3);
/// # Ok::<(), configit::SchemaError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct SchemaBuilder {
    definitions: Vec<AttributeDefinition>,
    index: HashMap<String, usize>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new attribute.
    ///
    /// `declaration` may be `()`, a description, an [`AttributeOptions`], or
    /// a `(description, options)` pair.
    ///
    /// Fails with [`SchemaError::AttributeAlreadyDefined`] if `name` was
    /// already declared; the earlier declaration is kept.
    pub fn attribute(
        &mut self,
        name: &str,
        declaration: impl Into<Declaration>,
    ) -> Result<&AttributeDefinition, SchemaError> {
        if self.index.contains_key(name) {
            return Err(SchemaError::AttributeAlreadyDefined(name.to_string()));
        }

        let definition = AttributeDefinition::new(name, declaration)?;
        let position = self.definitions.len();
        self.index.insert(name.to_string(), position);
        self.definitions.push(definition);
        Ok(&self.definitions[position])
    }

    /// Declares attributes from a document.
    ///
    /// Each top-level entry names an attribute. Its value is either a
    /// description string or a mapping holding an optional `description`
    /// plus the usual options:
    ///
    /// ```toml
    /// name = "The name of the service"
    ///
    /// [port]
    /// type = "integer"
    /// required = true
    /// default = 80
    /// ```
    ///
    /// Either every entry is declared or none is: on failure the builder is
    /// left as it was. Returns the number of attributes declared.
    pub fn declare_from_str(&mut self, parser: &dyn Parser, text: &str) -> Result<usize, Error> {
        let document = parser.parse(text)?;
        let start = self.definitions.len();

        for (name, value) in document {
            if let Err(e) = self.declare_entry(name, value) {
                for definition in self.definitions.drain(start..) {
                    self.index.remove(definition.name());
                }
                return Err(e);
            }
        }

        Ok(self.definitions.len() - start)
    }

    fn declare_entry(&mut self, name: String, value: RawValue) -> Result<(), Error> {
        let declaration = match value {
            RawValue::String(description) => Declaration::from(description),
            RawValue::Mapping(mut entries) => {
                let description = match entries.iter().position(|(k, _)| k == "description") {
                    Some(i) => match entries.remove(i).1 {
                        RawValue::String(s) => Some(s),
                        RawValue::Nil => None,
                        _ => {
                            return Err(SchemaError::InvalidOptionValue {
                                option: "description".into(),
                                expected: "a string",
                            }
                            .into())
                        }
                    },
                    None => None,
                };
                let options = AttributeOptions::try_from(&RawValue::Mapping(entries))?;
                Declaration::new(description, options)
            }
            RawValue::Nil => Declaration::default(),
            _ => return Err(SchemaError::InvalidDeclaration(name).into()),
        };
        self.attribute(&name, declaration)?;
        Ok(())
    }

    /// Freezes the declared attributes into a shareable schema.
    pub fn build(self) -> Arc<Schema> {
        Schema::from_parts(self.definitions, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TomlParser, YamlParser};
    use crate::convert::TypeTag;

    #[test]
    fn test_declares_in_order() {
        let mut builder = SchemaBuilder::new();
        builder.attribute("name", "The name").unwrap();
        builder
            .attribute("port", AttributeOptions::new().of_type(TypeTag::INTEGER))
            .unwrap();
        let schema = builder.build();

        let names: Vec<&str> = schema.iter().map(AttributeDefinition::name).collect();
        assert_eq!(names, ["name", "port"]);
        assert_eq!(schema.get("name").unwrap().description(), Some("The name"));
        assert_eq!(schema.get("port").unwrap().description(), None);
        assert!(!schema.contains("missing"));
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut builder = SchemaBuilder::new();
        builder.attribute("name", "first").unwrap();
        let err = builder
            .attribute("name", ("second", AttributeOptions::new().required(true)))
            .unwrap_err();
        assert_eq!(err, SchemaError::AttributeAlreadyDefined("name".into()));

        let schema = builder.build();
        assert_eq!(schema.len(), 1);
        let name = schema.get("name").unwrap();
        assert_eq!(name.description(), Some("first"));
        assert!(!name.is_required());
    }

    #[test]
    fn test_invalid_name_is_not_registered() {
        let mut builder = SchemaBuilder::new();
        assert!(matches!(
            builder.attribute("bad name", ()),
            Err(SchemaError::InvalidAttributeName(_))
        ));
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_declare_from_toml() {
        let mut builder = SchemaBuilder::new();
        let count = builder
            .declare_from_str(
                &TomlParser,
                r#"
                name = "The name of the service"

                [port]
                description = "Port to listen on"
                type = "integer"
                required = true
                default = 80
                "#,
            )
            .unwrap();
        assert_eq!(count, 2);

        let schema = builder.build();
        let port = schema.get("port").unwrap();
        assert_eq!(port.description(), Some("Port to listen on"));
        assert_eq!(port.type_tag(), &TypeTag::INTEGER);
        assert!(port.is_required());
        assert_eq!(port.default(), &RawValue::Integer(80));
        assert_eq!(
            schema.get("name").unwrap().description(),
            Some("The name of the service")
        );
    }

    #[test]
    fn test_declare_from_yaml_rejects_unknown_options() {
        let mut builder = SchemaBuilder::new();
        let err = builder
            .declare_from_str(&YamlParser, "port:\n  type: integer\n  minimum: 1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::InvalidOptions(ref keys)) if keys == &["minimum".to_string()]
        ));
    }

    #[test]
    fn test_declare_from_yaml_rejects_duplicates() {
        let mut builder = SchemaBuilder::new();
        builder.attribute("name", ()).unwrap();
        let err = builder
            .declare_from_str(&YamlParser, "name: Another name\n")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::AttributeAlreadyDefined(_))
        ));
    }

    #[test]
    fn test_declare_from_str_is_all_or_nothing() {
        let mut builder = SchemaBuilder::new();
        builder.attribute("name", ()).unwrap();

        let err = builder
            .declare_from_str(&YamlParser, "port:\n  type: integer\nhost:\n  minimum: 1\n")
            .unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::InvalidOptions(_))));

        let err = builder
            .declare_from_str(&YamlParser, "port: Port to listen on\nname: Again\n")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::AttributeAlreadyDefined(_))
        ));

        // port was rolled back both times, so it can still be declared
        let count = builder
            .declare_from_str(&YamlParser, "port: Port to listen on\n")
            .unwrap();
        assert_eq!(count, 1);

        let schema = builder.build();
        let names: Vec<&str> = schema.iter().map(AttributeDefinition::name).collect();
        assert_eq!(names, ["name", "port"]);
    }
}
