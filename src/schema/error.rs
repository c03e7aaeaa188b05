use thiserror::Error;

/// Errors raised while declaring a schema. These are programmer mistakes
/// and abort the declaration immediately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("attribute name must be an identifier, got {0:?}")]
    InvalidAttributeName(String),

    #[error("invalid options {}", .0.join(","))]
    InvalidOptions(Vec<String>),

    #[error("option '{option}' must be {expected}")]
    InvalidOptionValue {
        option: String,
        expected: &'static str,
    },

    #[error("declaration of '{0}' must be a description or a mapping of options")]
    InvalidDeclaration(String),

    #[error("attribute '{0}' is already defined")]
    AttributeAlreadyDefined(String),
}
