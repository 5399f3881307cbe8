//! Scalar cell values.
//!
//! The driver's per-column dynamic typing is represented as a closed
//! variant rather than an open "any" type, so the JSON conversion is
//! exhaustiveness-checked at compile time. Types with no direct JSON
//! equivalent (temporal, binary, uuid, decimal) arrive here already
//! rendered to their fixed textual encoding as `Text`.

use serde_json::Value as JsonValue;

/// A single decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// SQL NULL. Serializes to JSON `null`, never to a string.
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integers above i64::MAX (MySQL BIGINT UNSIGNED).
    UInt(u64),
    Float(f64),
    /// Character data, plus the fixed textual encodings for decimal,
    /// temporal, uuid, and binary values.
    Text(String),
}

impl CellValue {
    /// Convert into a JSON value without losing NULL-ness or precision.
    ///
    /// Integers stay integers (serde_json numbers are arbitrary 64-bit,
    /// so no float truncation). Non-finite floats have no JSON number
    /// form and fall back to their text rendering.
    pub fn into_json(self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(v),
            Self::Int(v) => JsonValue::Number(v.into()),
            Self::UInt(v) => JsonValue::Number(v.into()),
            Self::Float(v) => serde_json::Number::from_f64(v)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(v.to_string())),
            Self::Text(v) => JsonValue::String(v),
        }
    }

}
