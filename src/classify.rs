//! Runtime shape tests.
//!
//! These are the only functions that look at an input's runtime kind; every combinator narrows its
//! input through them.

use core::fmt;

use crate::error::{DecoderError, DecoderResult, ErrorVariant};
use crate::{Array, Object, Value};

/// Object key that is never decoded, encoded, or reported as an extra field.
///
/// Dynamic hosts treat this key as an escape into the object's prototype chain; skipping it keeps
/// decoded records free of that hazard when values cross into such a host.
pub const RESERVED_KEY: &str = "__proto__";

/// The runtime kinds a type-dispatch union can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// [`Value::Undefined`].
    Undefined,
    /// [`Value::Null`].
    Null,
    /// [`Value::Bool`].
    Boolean,
    /// [`Value::Number`].
    Number,
    /// [`Value::Text`].
    String,
    /// [`Value::Array`].
    Array,
    /// Anything else.
    Object,
}

impl Kind {
    /// Every kind, in classification order.
    pub const ALL: [Self; 7] = [
        Self::Undefined,
        Self::Null,
        Self::Boolean,
        Self::Number,
        Self::String,
        Self::Array,
        Self::Object,
    ];

    /// Classify a value.
    ///
    /// Symbols, regular expressions, functions and host values classify as [`Kind::Object`].
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Undefined => Self::Undefined,
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::Text(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Symbol(_)
            | Value::RegExp(_)
            | Value::Function(_)
            | Value::Object(_)
            | Value::Host(_) => Self::Object,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrow to a boolean.
///
/// # Errors
///
/// Returns a `boolean` mismatch carrying `value` otherwise.
pub fn narrow_boolean(value: &Value) -> DecoderResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(DecoderError::new(ErrorVariant::Boolean { got: value.clone() })),
    }
}

/// Narrow to a number.
///
/// # Errors
///
/// Returns a `number` mismatch carrying `value` otherwise.
pub fn narrow_number(value: &Value) -> DecoderResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(DecoderError::new(ErrorVariant::Number { got: value.clone() })),
    }
}

/// Narrow to text.
///
/// # Errors
///
/// Returns a `string` mismatch carrying `value` otherwise.
pub fn narrow_text(value: &Value) -> DecoderResult<&str> {
    match value {
        Value::Text(s) => Ok(s),
        _ => Err(DecoderError::new(ErrorVariant::String { got: value.clone() })),
    }
}

/// Narrow to a sequence.
///
/// # Errors
///
/// Returns an `array` mismatch carrying `value` otherwise.
pub fn narrow_sequence(value: &Value) -> DecoderResult<&Array> {
    match value {
        Value::Array(a) => Ok(a),
        _ => Err(DecoderError::new(ErrorVariant::Array { got: value.clone() })),
    }
}

/// Narrow to a keyed map. Sequences, null, and opaque kinds are not keyed maps.
///
/// # Errors
///
/// Returns an `object` mismatch carrying `value` otherwise.
pub fn narrow_keyed_map(value: &Value) -> DecoderResult<&Object> {
    match value {
        Value::Object(o) => Ok(o),
        _ => Err(DecoderError::new(ErrorVariant::Object { got: value.clone() })),
    }
}
