use crate::convert::TypeTag;
use crate::value::RawValue;

use super::SchemaError;

/// Options recognized when declaring an attribute.
///
/// ```
/// use configit::{AttributeOptions, TypeTag};
///
/// let options = AttributeOptions::new()
///     .required(true)
///     .of_type(TypeTag::INTEGER)
///     .default(80);
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeOptions {
    required: bool,
    type_tag: TypeTag,
    default: RawValue,
}

impl AttributeOptions {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn of_type(mut self, type_tag: impl Into<TypeTag>) -> Self {
        self.type_tag = type_tag.into();
        self
    }

    #[must_use]
    pub fn default(mut self, value: impl Into<RawValue>) -> Self {
        self.default = value.into();
        self
    }
}

impl TryFrom<&RawValue> for AttributeOptions {
    type Error = SchemaError;

    /// Reads options from a raw mapping with the keys `required`, `type` and
    /// `default`. Any other key is rejected.
    fn try_from(raw: &RawValue) -> Result<Self, SchemaError> {
        let entries = raw.as_mapping().ok_or_else(|| SchemaError::InvalidOptionValue {
            option: "options".into(),
            expected: "a mapping",
        })?;

        let mut options = AttributeOptions::new();
        let mut unknown = Vec::new();

        for (key, value) in entries {
            match key.as_str() {
                "required" => {
                    let required = match value {
                        RawValue::Nil => false,
                        RawValue::Bool(b) => *b,
                        _ => {
                            return Err(SchemaError::InvalidOptionValue {
                                option: key.clone(),
                                expected: "true or false",
                            })
                        }
                    };
                    options = options.required(required);
                }
                "type" => {
                    let tag = value.as_str().ok_or_else(|| SchemaError::InvalidOptionValue {
                        option: key.clone(),
                        expected: "a type name",
                    })?;
                    options = options.of_type(tag.to_string());
                }
                "default" => options = options.default(value.clone()),
                _ => unknown.push(key.clone()),
            }
        }

        if !unknown.is_empty() {
            return Err(SchemaError::InvalidOptions(unknown));
        }
        Ok(options)
    }
}

/// The optional description and options of an attribute declaration.
///
/// Converts from `()`, a description, an [`AttributeOptions`], or a
/// `(description, options)` pair, so callers can leave out whichever part
/// they don't need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declaration {
    description: Option<String>,
    options: AttributeOptions,
}

impl Declaration {
    pub fn new(description: Option<impl Into<String>>, options: AttributeOptions) -> Self {
        Self {
            description: description.map(Into::into),
            options,
        }
    }
}

impl From<()> for Declaration {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<&str> for Declaration {
    fn from(description: &str) -> Self {
        Self::new(Some(description), AttributeOptions::new())
    }
}

impl From<String> for Declaration {
    fn from(description: String) -> Self {
        Self::new(Some(description), AttributeOptions::new())
    }
}

impl From<AttributeOptions> for Declaration {
    fn from(options: AttributeOptions) -> Self {
        Self::new(None::<String>, options)
    }
}

impl<D: Into<String>> From<(D, AttributeOptions)> for Declaration {
    fn from((description, options): (D, AttributeOptions)) -> Self {
        Self::new(Some(description), options)
    }
}

/// The definition of a single attribute in a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    name: String,
    description: Option<String>,
    type_tag: TypeTag,
    required: bool,
    default: RawValue,
}

impl AttributeDefinition {
    /// Creates a definition, rejecting names that are not identifiers.
    pub fn new(name: &str, declaration: impl Into<Declaration>) -> Result<Self, SchemaError> {
        if !is_identifier(name) {
            return Err(SchemaError::InvalidAttributeName(name.to_string()));
        }

        let Declaration {
            description,
            options,
        } = declaration.into();

        Ok(Self {
            name: name.to_string(),
            description,
            type_tag: options.type_tag,
            required: options.required,
            default: options.default,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The raw default; `Nil` when none was declared.
    pub fn default(&self) -> &RawValue {
        &self.default
    }

    /// Returns an error message if `value` does not satisfy this attribute.
    ///
    /// Only required-ness is checked: a required attribute whose value and
    /// default are both blank is an error. Type checks happen on read.
    pub fn validate(&self, value: Option<&RawValue>) -> Option<String> {
        let value_blank = value.map_or(true, RawValue::is_blank);
        if self.required && value_blank && self.default.is_blank() {
            return Some(format!("{} is a required attribute", self.name));
        }
        None
    }
}

/// ASCII letters, digits and `_`, plus any non-ASCII character that isn't
/// whitespace or a control character. Must not start with a digit.
fn is_identifier(name: &str) -> bool {
    let word_char = |c: char| {
        c == '_' || c.is_ascii_alphanumeric() || !(c.is_ascii() || c.is_whitespace() || c.is_control())
    };
    match name.chars().next() {
        Some(first) if !first.is_ascii_digit() => name.chars().all(word_char),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(entries: &[(&str, RawValue)]) -> RawValue {
        RawValue::Mapping(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let attr = AttributeDefinition::new("name", ()).unwrap();
        assert_eq!(attr.name(), "name");
        assert_eq!(attr.description(), None);
        assert_eq!(attr.type_tag(), &TypeTag::STRING);
        assert!(!attr.is_required());
        assert_eq!(attr.default(), &RawValue::Nil);
    }

    #[test]
    fn test_description_and_options() {
        let attr = AttributeDefinition::new(
            "port",
            (
                "Port to listen on",
                AttributeOptions::new()
                    .required(true)
                    .of_type(TypeTag::INTEGER)
                    .default(80),
            ),
        )
        .unwrap();
        assert_eq!(attr.description(), Some("Port to listen on"));
        assert_eq!(attr.type_tag(), &TypeTag::INTEGER);
        assert!(attr.is_required());
        assert_eq!(attr.default(), &RawValue::Integer(80));
    }

    #[test]
    fn test_rejects_non_identifier_names() {
        for name in ["", "1port", "log-level", "with space", "a.b"] {
            assert_eq!(
                AttributeDefinition::new(name, ()),
                Err(SchemaError::InvalidAttributeName(name.to_string()))
            );
        }
        assert!(AttributeDefinition::new("_private2", ()).is_ok());
        assert!(AttributeDefinition::new("größe", ()).is_ok());
    }

    #[test]
    fn test_validate_required() {
        let attr = AttributeDefinition::new("name", AttributeOptions::new().required(true)).unwrap();
        assert_eq!(attr.validate(None), Some("name is a required attribute".to_string()));
        assert!(attr.validate(Some(&RawValue::Nil)).is_some());
        assert!(attr.validate(Some(&RawValue::from(""))).is_some());
        assert_eq!(attr.validate(Some(&RawValue::from("svc"))), None);
        assert_eq!(attr.validate(Some(&RawValue::from(0))), None);
    }

    #[test]
    fn test_validate_required_with_default() {
        let attr = AttributeDefinition::new(
            "port",
            AttributeOptions::new().required(true).default(80),
        )
        .unwrap();
        assert_eq!(attr.validate(None), None);

        let blank_default = AttributeDefinition::new(
            "host",
            AttributeOptions::new().required(true).default(""),
        )
        .unwrap();
        assert!(blank_default.validate(Some(&RawValue::from(""))).is_some());
    }

    #[test]
    fn test_validate_optional_never_errors() {
        let attr = AttributeDefinition::new("name", ()).unwrap();
        assert_eq!(attr.validate(None), None);
        assert_eq!(attr.validate(Some(&RawValue::from(""))), None);
    }

    #[test]
    fn test_options_from_raw() {
        let raw = mapping(&[
            ("required", RawValue::from(true)),
            ("type", RawValue::from("float")),
            ("default", RawValue::from(0.5)),
        ]);
        let options = AttributeOptions::try_from(&raw).unwrap();
        assert_eq!(
            options,
            AttributeOptions::new()
                .required(true)
                .of_type(TypeTag::FLOAT)
                .default(0.5)
        );
    }

    #[test]
    fn test_options_from_raw_rejects_unknown_keys() {
        let raw = mapping(&[
            ("required", RawValue::from(true)),
            ("min", RawValue::from(1)),
            ("max", RawValue::from(9)),
        ]);
        let err = AttributeOptions::try_from(&raw).unwrap_err();
        assert_eq!(err, SchemaError::InvalidOptions(vec!["min".into(), "max".into()]));
        assert_eq!(err.to_string(), "invalid options min,max");
    }

    #[test]
    fn test_options_from_raw_rejects_bad_values() {
        let raw = mapping(&[("required", RawValue::from("yes"))]);
        assert!(matches!(
            AttributeOptions::try_from(&raw),
            Err(SchemaError::InvalidOptionValue { .. })
        ));
        assert!(AttributeOptions::try_from(&RawValue::from(1)).is_err());
    }
}
