//! Dynamically typed decode result.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::wire::WireType;
use crate::util::Timestamp;

/// A value decoded from an element without a target type.
///
/// Integers widen to 64 bits and floats to `f64`; the original wire width is
/// not kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Nil element.
    #[default]
    Null,
    String(String),
    Bool(bool),
    /// Any signed integer tag.
    Int64(i64),
    /// Any unsigned integer tag.
    Uint64(u64),
    /// `float` or `double`.
    Float64(f64),
    Timestamp(Timestamp),
    /// Struct fields keyed by child name.
    Record(BTreeMap<String, Value>),
    /// Array items in document order.
    Sequence(Vec<Value>),
    /// Map entries; keys are unique under `==`.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Returns the wire type this value decodes from, or None for `Null`.
    ///
    /// Widened variants report their widest tag.
    pub fn wire_type(&self) -> Option<WireType> {
        match self {
            Value::Null => None,
            Value::String(_) => Some(WireType::String),
            Value::Bool(_) => Some(WireType::Boolean),
            Value::Int64(_) => Some(WireType::Long),
            Value::Uint64(_) => Some(WireType::UnsignedLong),
            Value::Float64(_) => Some(WireType::Double),
            Value::Timestamp(_) => Some(WireType::DateTime),
            Value::Record(_) => Some(WireType::Struct),
            Value::Sequence(_) => Some(WireType::Array),
            Value::Map(_) => Some(WireType::Map),
        }
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a map entry by key.
    pub fn map_get(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Inserts into a map entry list, replacing the value of an equal key.
    pub(crate) fn map_insert(entries: &mut Vec<(Value, Value)>, key: Value, value: Value) {
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("<nil>"),
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Uint64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Timestamp(t) => write!(f, "{}", t),
            Value::Record(fields) => {
                f.write_str("{")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", name, v)?;
                }
                f.write_str("}")
            }
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("map[")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", k, v)?;
                }
                f.write_str("]")
            }
        }
    }
}
