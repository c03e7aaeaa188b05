//! Type tags and the read-time conversion table.
//!
//! Conversions are best-effort and never fail: malformed numeric text
//! coerces to zero, absent values coerce to the zero value of the type.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::value::RawValue;

/// The declared type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    pub const STRING: TypeTag = TypeTag(Cow::Borrowed("string"));
    pub const INTEGER: TypeTag = TypeTag(Cow::Borrowed("integer"));
    pub const FLOAT: TypeTag = TypeTag(Cow::Borrowed("float"));
    pub const SYMBOL: TypeTag = TypeTag(Cow::Borrowed("symbol"));

    /// Creates a tag for a custom converter.
    pub const fn new(name: &'static str) -> Self {
        TypeTag(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TypeTag {
    fn default() -> Self {
        TypeTag::STRING
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeTag {
    fn from(name: &'static str) -> Self {
        TypeTag::new(name)
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        TypeTag(Cow::Owned(name))
    }
}

/// An identifier-like token produced by the `symbol` converter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A value after conversion to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Float(f64),
    Symbol(Symbol),
    Bool(bool),
    /// Passed through unconverted by a custom converter.
    Raw(RawValue),
}

impl TypedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            TypedValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// A pure conversion from a raw value to a typed one.
pub type ConvertFn = fn(&RawValue) -> TypedValue;

/// Mapping from type tag to conversion function.
///
/// The standard table is built once and shared; custom tables are built by
/// extending a clone of it with [`Converters::with`].
#[derive(Clone)]
pub struct Converters {
    table: HashMap<TypeTag, ConvertFn>,
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.table.keys().map(TypeTag::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("Converters").field("types", &tags).finish()
    }
}

impl Converters {
    /// Returns the shared table holding `string`, `integer`, `float` and `symbol`.
    pub fn standard() -> Arc<Converters> {
        static STANDARD: OnceLock<Arc<Converters>> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                let mut table: HashMap<TypeTag, ConvertFn> = HashMap::new();
                table.insert(TypeTag::STRING, to_string);
                table.insert(TypeTag::INTEGER, to_integer);
                table.insert(TypeTag::FLOAT, to_float);
                table.insert(TypeTag::SYMBOL, to_symbol);
                Arc::new(Converters { table })
            })
            .clone()
    }

    /// Registers (or replaces) the converter for `tag`.
    #[must_use]
    pub fn with(mut self, tag: impl Into<TypeTag>, convert: ConvertFn) -> Self {
        self.table.insert(tag.into(), convert);
        self
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.table.contains_key(tag)
    }

    /// Converts `raw` with the converter registered for `tag`.
    ///
    /// Returns `None` only when no converter is registered.
    pub fn convert(&self, tag: &TypeTag, raw: &RawValue) -> Option<TypedValue> {
        self.table.get(tag).map(|convert| convert(raw))
    }
}

impl Default for Converters {
    fn default() -> Self {
        Converters::standard().as_ref().clone()
    }
}

fn to_string(raw: &RawValue) -> TypedValue {
    TypedValue::String(raw.to_string())
}

fn to_integer(raw: &RawValue) -> TypedValue {
    let value = match raw {
        RawValue::Integer(i) => *i,
        // `as` saturates and maps NaN to zero
        RawValue::Float(x) => x.trunc() as i64,
        RawValue::Bool(b) => i64::from(*b),
        RawValue::String(s) => parse_integer_prefix(s),
        RawValue::Nil | RawValue::Sequence(_) | RawValue::Mapping(_) => 0,
    };
    TypedValue::Integer(value)
}

fn to_float(raw: &RawValue) -> TypedValue {
    let value = match raw {
        RawValue::Float(x) => *x,
        RawValue::Integer(i) => *i as f64,
        RawValue::Bool(b) => f64::from(u8::from(*b)),
        RawValue::String(s) => parse_float_prefix(s),
        RawValue::Nil | RawValue::Sequence(_) | RawValue::Mapping(_) => 0.0,
    };
    TypedValue::Float(value)
}

fn to_symbol(raw: &RawValue) -> TypedValue {
    TypedValue::Symbol(Symbol::new(raw.to_string()))
}

/// Collects digits from the front of `chars`, allowing single underscores
/// between digits. Stops at the first character that doesn't fit.
fn take_digits(chars: &[char], mut pos: usize, out: &mut String) -> usize {
    let start = pos;
    while pos < chars.len() {
        let c = chars[pos];
        if c.is_ascii_digit() {
            out.push(c);
            pos += 1;
        } else if c == '_'
            && pos > start
            && chars.get(pos + 1).is_some_and(|n| n.is_ascii_digit())
        {
            pos += 1;
        } else {
            break;
        }
    }
    pos
}

/// Splits off an optional sign after leading whitespace.
fn take_sign(chars: &[char], out: &mut String) -> usize {
    let mut pos = chars.iter().take_while(|c| c.is_whitespace()).count();
    if let Some(&c @ ('+' | '-')) = chars.get(pos) {
        if c == '-' {
            out.push('-');
        }
        pos += 1;
    }
    pos
}

fn parse_integer_prefix(s: &str) -> i64 {
    let chars: Vec<char> = s.chars().collect();
    let mut text = String::new();
    let pos = take_sign(&chars, &mut text);
    let digits_start = text.len();
    take_digits(&chars, pos, &mut text);

    if text.len() == digits_start {
        return 0;
    }
    text.parse::<i64>().unwrap_or_else(|_| {
        if text.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

fn parse_float_prefix(s: &str) -> f64 {
    let chars: Vec<char> = s.chars().collect();
    let mut text = String::new();
    let mut pos = take_sign(&chars, &mut text);

    let int_start = text.len();
    pos = take_digits(&chars, pos, &mut text);
    let has_int = text.len() > int_start;

    if chars.get(pos) == Some(&'.') && chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit()) {
        text.push('.');
        pos = take_digits(&chars, pos + 1, &mut text);
    } else if !has_int {
        return 0.0;
    }

    if let Some('e' | 'E') = chars.get(pos) {
        let mut exponent = String::from("e");
        let mut exp_pos = pos + 1;
        if let Some(&c @ ('+' | '-')) = chars.get(exp_pos) {
            exponent.push(c);
            exp_pos += 1;
        }
        let before = exponent.len();
        take_digits(&chars, exp_pos, &mut exponent);
        if exponent.len() > before {
            text.push_str(&exponent);
        }
    }

    text.parse::<f64>().unwrap_or(0.0)
}
