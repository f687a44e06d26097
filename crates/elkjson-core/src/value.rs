//! The JSON value space shared by layout properties and generic members.
//!
//! Layout option values and members under unrecognized keys are both stored
//! as [`JsonValue`]. Numbers keep the integer/float distinction of the
//! source text: `3` is [`Number::Int`] and `3.0` is [`Number::Float`].

use std::fmt;

/// A numeric literal as written in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The value as a floating point number.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    /// The value as an integer, if it was written as one.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int(value) => Some(value),
            Number::Float(_) => None,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(value) => write!(f, "{value}"),
            Number::Float(value) => write!(f, "{value:?}"),
        }
    }
}

/// Any JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    String(String),
    Number(Number),
    Object(Vec<JsonMember>),
    Array(Vec<JsonValue>),
    Bool(bool),
    Null,
}

impl JsonValue {
    /// A short name for the kind of value, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            JsonValue::String(_) => "string",
            JsonValue::Number(_) => "number",
            JsonValue::Object(_) => "object",
            JsonValue::Array(_) => "array",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Null => "null",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            JsonValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Look up a member of an object value by key.
    ///
    /// Returns the first member with that key; `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(members) => members
                .iter()
                .find(|member| member.key() == key)
                .map(JsonMember::value),
            _ => None,
        }
    }

    /// Whether this value may be used as a layout property value.
    pub fn is_property_value(&self) -> bool {
        matches!(
            self,
            JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)
        )
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<Number> for JsonValue {
    fn from(value: Number) -> Self {
        JsonValue::Number(value)
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

/// A key/value pair of a JSON object, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonMember {
    key: String,
    value: JsonValue,
}

impl JsonMember {
    pub fn new(key: impl Into<String>, value: JsonValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &JsonValue {
        &self.value
    }
}

/// A layout option attached to a graph element.
///
/// The value is always a string, number or boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    key: String,
    value: JsonValue,
}

impl Property {
    /// Create a new property.
    ///
    /// Callers are expected to pass a value for which
    /// [`JsonValue::is_property_value`] holds.
    pub fn new(key: impl Into<String>, value: JsonValue) -> Self {
        debug_assert!(value.is_property_value());
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &JsonValue {
        &self.value
    }
}
