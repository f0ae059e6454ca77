//! Native value to element tree.
//!
//! Scalars are tagged with the wire type of their exact width and rendered
//! canonically: decimal integers, `true`/`false`, fixed-precision scientific
//! floats and the nine-digit timestamp layout. Records become `Struct`
//! elements with one child per encoded field.

use tracing::trace;

use crate::error::EncodeError;
use crate::model::{Element, Field, Native, Record, WireType};
use crate::util::float::{format_f32, format_f64};

/// Encodes a native value as an element named `name`.
///
/// Fails with [`EncodeError::UnsupportedKind`] if a sequence or map is
/// reached, either at the top level or in a record field that is written.
pub fn encode(name: &str, value: &Native<'_>) -> Result<Element, EncodeError> {
    let element = match value {
        Native::Null => Element::nil(name),
        Native::String(s) => Element::scalar(name, WireType::String, &**s),
        Native::Bool(b) => Element::scalar(name, WireType::Boolean, if *b { "true" } else { "false" }),
        Native::I8(v) => Element::scalar(name, WireType::Byte, v.to_string()),
        Native::I16(v) => Element::scalar(name, WireType::Short, v.to_string()),
        Native::I32(v) => Element::scalar(name, WireType::Int, v.to_string()),
        Native::I64(v) => Element::scalar(name, WireType::Long, v.to_string()),
        Native::U8(v) => Element::scalar(name, WireType::UnsignedByte, v.to_string()),
        Native::U16(v) => Element::scalar(name, WireType::UnsignedShort, v.to_string()),
        Native::U32(v) => Element::scalar(name, WireType::UnsignedInt, v.to_string()),
        Native::U64(v) => Element::scalar(name, WireType::UnsignedLong, v.to_string()),
        Native::F32(v) => Element::scalar(name, WireType::Float, format_f32(*v)),
        Native::F64(v) => Element::scalar(name, WireType::Double, format_f64(*v)),
        Native::Timestamp(t) => Element::scalar(name, WireType::DateTime, t.format_soap()),
        Native::Record(fields) => {
            let mut children = Vec::with_capacity(fields.len());
            for field in fields {
                if field.skipped() {
                    continue;
                }
                children.push(encode(&field.directive.name, &field.value)?);
            }
            trace!(element = name, fields = fields.len(), written = children.len(), "encoded record");
            Element::compound(name, WireType::Struct, children)
        }
        Native::Sequence(_) | Native::Map(_) => {
            return Err(EncodeError::UnsupportedKind {
                name: name.to_string(),
                kind: value.kind_name(),
            });
        }
    };
    Ok(element)
}

/// Encodes any field-capable value (scalar, timestamp, option or record).
pub fn encode_field<T: Field>(name: &str, value: &T) -> Result<Element, EncodeError> {
    encode(name, &value.to_native())
}

/// Encodes a declared record.
pub fn encode_record<R: Record>(name: &str, record: &R) -> Result<Element, EncodeError> {
    encode(name, &record.to_native())
}
