//! Reading values out of elements.
//!
//! Two families of typed getters exist:
//!
//! - **strict** (`string`, `boolean`, `int`, `uint`, `float`, `timestamp` and
//!   their fixed-width forms): the wire type tag must be exactly the tag of
//!   the requested kind and width. A nil element never matches.
//! - **lenient** (`as_*`): the tag is ignored and the text is parsed into the
//!   requested kind with a wider vocabulary. A nil element yields the kind's
//!   zero value.
//!
//! Both families reject elements with children, which cannot hold a scalar.
//!
//! [`Element::value`] decodes without a target type, and [`Element::get`]
//! looks up a record field or map entry.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::DecodeError;
use crate::limits::{ITEM, ITEM_KEY, ITEM_VALUE, MAX_DEPTH};
use crate::model::wire::strip_ns;
use crate::model::{Element, FloatWidth, IntWidth, Value, WireType};
use crate::util::Timestamp;
use crate::util::float::{parse_f32, parse_f64};

/// Parses a decimal integer that must fit in `width` signed bits.
fn parse_int(text: &str, width: IntWidth) -> Option<i64> {
    match width {
        IntWidth::W8 => text.parse::<i8>().ok().map(i64::from),
        IntWidth::W16 => text.parse::<i16>().ok().map(i64::from),
        IntWidth::W32 => text.parse::<i32>().ok().map(i64::from),
        IntWidth::W64 => text.parse::<i64>().ok(),
    }
}

/// Parses a decimal integer that must fit in `width` unsigned bits.
fn parse_uint(text: &str, width: IntWidth) -> Option<u64> {
    match width {
        IntWidth::W8 => text.parse::<u8>().ok().map(u64::from),
        IntWidth::W16 => text.parse::<u16>().ok().map(u64::from),
        IntWidth::W32 => text.parse::<u32>().ok().map(u64::from),
        IntWidth::W64 => text.parse::<u64>().ok(),
    }
}

fn parse_float(text: &str, width: FloatWidth) -> Option<f64> {
    match width {
        FloatWidth::W32 => parse_f32(text).map(f64::from),
        FloatWidth::W64 => parse_f64(text),
    }
}

/// Boolean spellings accepted by lenient reads.
fn parse_bool_lenient(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl Element {
    /// Error for text that does not parse. `target` names the wanted type.
    fn bad_value(&self, target: String) -> DecodeError {
        let text = if self.has_children() {
            "{...}".to_string()
        } else {
            self.text.clone()
        };
        DecodeError::BadValue { text, target }
    }

    fn bad_wire_value(&self) -> DecodeError {
        self.bad_value(format!("wire:{}", self.local_type()))
    }

    fn bad_native_value(&self, native: &str) -> DecodeError {
        self.bad_value(format!("native:{}", native))
    }

    /// Checks the type tag for a strict scalar read.
    fn expect_scalar(&self, expected: WireType) -> Result<&str, DecodeError> {
        if self.nil {
            return Err(DecodeError::TypeMismatch {
                actual: "nil".to_string(),
                expected: expected.local_name(),
            });
        }
        if self.local_type() != expected.local_name() {
            return Err(DecodeError::TypeMismatch {
                actual: self.local_type().to_string(),
                expected: expected.local_name(),
            });
        }
        if self.has_children() {
            return Err(self.bad_wire_value());
        }
        Ok(&self.text)
    }

    /// Text for a lenient scalar read; None means nil (use the zero value).
    fn lenient_text(&self, native: &str) -> Result<Option<&str>, DecodeError> {
        if self.has_children() {
            return Err(self.bad_native_value(native));
        }
        if self.nil {
            return Ok(None);
        }
        Ok(Some(self.text.trim()))
    }

    // =========================================================================
    // Strict getters
    // =========================================================================

    /// Reads a `string` element.
    pub fn string(&self) -> Result<&str, DecodeError> {
        self.expect_scalar(WireType::String)
    }

    /// Reads a `boolean` element; only `true` and `false` are accepted.
    pub fn boolean(&self) -> Result<bool, DecodeError> {
        match self.expect_scalar(WireType::Boolean)? {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(self.bad_wire_value()),
        }
    }

    /// Reads a signed integer element of exactly `width` bits.
    pub fn int(&self, width: IntWidth) -> Result<i64, DecodeError> {
        let text = self.expect_scalar(WireType::for_int(width))?;
        parse_int(text, width).ok_or_else(|| self.bad_wire_value())
    }

    pub fn int8(&self) -> Result<i8, DecodeError> {
        self.int(IntWidth::W8).map(|v| v as i8)
    }

    pub fn int16(&self) -> Result<i16, DecodeError> {
        self.int(IntWidth::W16).map(|v| v as i16)
    }

    pub fn int32(&self) -> Result<i32, DecodeError> {
        self.int(IntWidth::W32).map(|v| v as i32)
    }

    pub fn int64(&self) -> Result<i64, DecodeError> {
        self.int(IntWidth::W64)
    }

    /// Reads an unsigned integer element of exactly `width` bits.
    pub fn uint(&self, width: IntWidth) -> Result<u64, DecodeError> {
        let text = self.expect_scalar(WireType::for_uint(width))?;
        parse_uint(text, width).ok_or_else(|| self.bad_wire_value())
    }

    pub fn uint8(&self) -> Result<u8, DecodeError> {
        self.uint(IntWidth::W8).map(|v| v as u8)
    }

    pub fn uint16(&self) -> Result<u16, DecodeError> {
        self.uint(IntWidth::W16).map(|v| v as u16)
    }

    pub fn uint32(&self) -> Result<u32, DecodeError> {
        self.uint(IntWidth::W32).map(|v| v as u32)
    }

    pub fn uint64(&self) -> Result<u64, DecodeError> {
        self.uint(IntWidth::W64)
    }

    /// Reads a `float` or `double` element, parsed at that precision.
    pub fn float(&self, width: FloatWidth) -> Result<f64, DecodeError> {
        let text = self.expect_scalar(WireType::for_float(width))?;
        parse_float(text, width).ok_or_else(|| self.bad_wire_value())
    }

    pub fn float32(&self) -> Result<f32, DecodeError> {
        self.float(FloatWidth::W32).map(|v| v as f32)
    }

    pub fn float64(&self) -> Result<f64, DecodeError> {
        self.float(FloatWidth::W64)
    }

    /// Reads a `dateTime` element in the canonical layout.
    pub fn timestamp(&self) -> Result<Timestamp, DecodeError> {
        let text = self.expect_scalar(WireType::DateTime)?;
        Timestamp::parse_soap(text).map_err(|_| self.bad_wire_value())
    }

    // =========================================================================
    // Lenient getters
    // =========================================================================

    /// Returns the text whatever the tag; empty for nil.
    pub fn as_string(&self) -> Result<&str, DecodeError> {
        if self.has_children() {
            return Err(self.bad_native_value("String"));
        }
        if self.nil {
            return Ok("");
        }
        Ok(&self.text)
    }

    /// Parses the text as a boolean, accepting `1`/`0`, `t`/`f` and case variants.
    pub fn as_bool(&self) -> Result<bool, DecodeError> {
        match self.lenient_text("bool")? {
            None => Ok(false),
            Some(text) => parse_bool_lenient(text).ok_or_else(|| self.bad_native_value("bool")),
        }
    }

    /// Parses the text as a signed integer that fits in `width` bits.
    pub fn as_int(&self, width: IntWidth) -> Result<i64, DecodeError> {
        match self.lenient_text(width.signed_name())? {
            None => Ok(0),
            Some(text) => {
                parse_int(text, width).ok_or_else(|| self.bad_native_value(width.signed_name()))
            }
        }
    }

    pub fn as_int8(&self) -> Result<i8, DecodeError> {
        self.as_int(IntWidth::W8).map(|v| v as i8)
    }

    pub fn as_int16(&self) -> Result<i16, DecodeError> {
        self.as_int(IntWidth::W16).map(|v| v as i16)
    }

    pub fn as_int32(&self) -> Result<i32, DecodeError> {
        self.as_int(IntWidth::W32).map(|v| v as i32)
    }

    pub fn as_int64(&self) -> Result<i64, DecodeError> {
        self.as_int(IntWidth::W64)
    }

    /// Parses the text as an unsigned integer that fits in `width` bits.
    pub fn as_uint(&self, width: IntWidth) -> Result<u64, DecodeError> {
        match self.lenient_text(width.unsigned_name())? {
            None => Ok(0),
            Some(text) => {
                parse_uint(text, width).ok_or_else(|| self.bad_native_value(width.unsigned_name()))
            }
        }
    }

    pub fn as_uint8(&self) -> Result<u8, DecodeError> {
        self.as_uint(IntWidth::W8).map(|v| v as u8)
    }

    pub fn as_uint16(&self) -> Result<u16, DecodeError> {
        self.as_uint(IntWidth::W16).map(|v| v as u16)
    }

    pub fn as_uint32(&self) -> Result<u32, DecodeError> {
        self.as_uint(IntWidth::W32).map(|v| v as u32)
    }

    pub fn as_uint64(&self) -> Result<u64, DecodeError> {
        self.as_uint(IntWidth::W64)
    }

    /// Parses the text as a float at `width` precision.
    pub fn as_float(&self, width: FloatWidth) -> Result<f64, DecodeError> {
        match self.lenient_text(width.name())? {
            None => Ok(0.0),
            Some(text) => parse_float(text, width).ok_or_else(|| self.bad_native_value(width.name())),
        }
    }

    pub fn as_float32(&self) -> Result<f32, DecodeError> {
        self.as_float(FloatWidth::W32).map(|v| v as f32)
    }

    pub fn as_float64(&self) -> Result<f64, DecodeError> {
        self.as_float(FloatWidth::W64)
    }

    /// Parses the text as a timestamp; offset-less layouts are read as UTC.
    pub fn as_timestamp(&self) -> Result<Timestamp, DecodeError> {
        self.as_timestamp_in(0)
    }

    /// Parses the text as a timestamp; offset-less layouts are read at `offset_min`.
    pub fn as_timestamp_in(&self, offset_min: i16) -> Result<Timestamp, DecodeError> {
        match self.lenient_text("Timestamp")? {
            None => Ok(Timestamp::default()),
            Some(text) => Timestamp::parse_lenient(text, offset_min)
                .map_err(|_| self.bad_native_value("Timestamp")),
        }
    }

    // =========================================================================
    // Structural access
    // =========================================================================

    /// Splits a map entry into its `key` and `value` elements.
    ///
    /// The entry must be named `item` and have exactly two children, found by
    /// name in either order.
    pub fn map_item(&self) -> Result<(&Element, &Element), DecodeError> {
        if self.local_name() != ITEM {
            return Err(DecodeError::NotMapItem {
                name: self.name.clone(),
            });
        }
        let [first, second] = self.children.as_slice() else {
            return Err(DecodeError::MapItemArity {
                count: self.children.len(),
            });
        };
        let key = if first.local_name() == ITEM_KEY {
            first
        } else if second.local_name() == ITEM_KEY {
            second
        } else {
            return Err(DecodeError::MapItemWithoutKey);
        };
        let value = if second.local_name() == ITEM_VALUE {
            second
        } else if first.local_name() == ITEM_VALUE {
            first
        } else {
            return Err(DecodeError::MapItemWithoutValue);
        };
        Ok((key, value))
    }

    /// Looks up a record field by name or a map entry by key.
    ///
    /// Returns `Ok(None)` when nothing matches. Record lookups only match
    /// string keys. Map lookups decode each entry's key and compare it with
    /// `key`; a malformed entry met before the match is an error.
    pub fn get(&self, key: &Value) -> Result<Option<&Element>, DecodeError> {
        if self.nil {
            return Err(DecodeError::NilContainer {
                name: self.name.clone(),
            });
        }
        match self.wire() {
            Some(WireType::Struct) => {
                let Value::String(name) = key else {
                    return Ok(None);
                };
                let name = strip_ns(name);
                Ok(self.children.iter().find(|c| c.local_name() == name))
            }
            Some(WireType::Map) => {
                for item in &self.children {
                    let (k, v) = item.map_item()?;
                    if k.value()? == *key {
                        return Ok(Some(v));
                    }
                }
                Ok(None)
            }
            _ => Err(DecodeError::TypeMismatch {
                actual: self.local_type().to_string(),
                expected: "Struct or Map",
            }),
        }
    }

    /// [`get`](Self::get) with a field name.
    pub fn field(&self, name: &str) -> Result<Option<&Element>, DecodeError> {
        self.get(&Value::String(name.to_string()))
    }

    /// [`get`](Self::get) followed by [`value`](Self::value).
    pub fn get_value(&self, key: &Value) -> Result<Option<Value>, DecodeError> {
        match self.get(key)? {
            Some(child) => child.value().map(Some),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Dynamic decode
    // =========================================================================

    /// Decodes the tree into a [`Value`], walking at most [`MAX_DEPTH`] levels.
    ///
    /// Nil elements decode to [`Value::Null`] whatever their tag. In records,
    /// a repeated child name overwrites the earlier one.
    pub fn value(&self) -> Result<Value, DecodeError> {
        self.value_with_limit(MAX_DEPTH)
    }

    /// [`value`](Self::value) with an explicit depth limit.
    pub fn value_with_limit(&self, max_depth: usize) -> Result<Value, DecodeError> {
        self.value_at(1, max_depth)
    }

    fn value_at(&self, depth: usize, max_depth: usize) -> Result<Value, DecodeError> {
        if self.nil {
            return Ok(Value::Null);
        }
        if depth > max_depth {
            return Err(DecodeError::DepthExceedsLimit { max: max_depth });
        }
        let Some(wire) = self.wire() else {
            return Err(DecodeError::UnknownType {
                wire_type: self.wire_type.clone(),
            });
        };
        if !wire.is_compound() && self.has_children() {
            return Err(self.bad_wire_value());
        }
        let text = self.text.as_str();
        match wire {
            WireType::String => Ok(Value::String(self.text.clone())),
            WireType::Boolean => match text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(self.bad_wire_value()),
            },
            WireType::Byte | WireType::Short | WireType::Int | WireType::Long => text
                .parse::<i64>()
                .map(Value::Int64)
                .map_err(|_| self.bad_wire_value()),
            WireType::UnsignedByte
            | WireType::UnsignedShort
            | WireType::UnsignedInt
            | WireType::UnsignedLong => text
                .parse::<u64>()
                .map(Value::Uint64)
                .map_err(|_| self.bad_wire_value()),
            WireType::Float | WireType::Double => {
                parse_f64(text).map(Value::Float64).ok_or_else(|| self.bad_wire_value())
            }
            WireType::DateTime => Timestamp::parse_soap(text)
                .map(Value::Timestamp)
                .map_err(|_| self.bad_wire_value()),
            WireType::Struct => {
                let mut fields = BTreeMap::new();
                for child in &self.children {
                    let v = child.value_at(depth + 1, max_depth)?;
                    if fields.insert(child.local_name().to_string(), v).is_some() {
                        debug!(
                            record = %self.name,
                            field = %child.local_name(),
                            "duplicate record field, last value wins"
                        );
                    }
                }
                Ok(Value::Record(fields))
            }
            WireType::Array => {
                let mut items = Vec::with_capacity(self.children.len());
                for child in &self.children {
                    if child.local_name() != ITEM {
                        return Err(DecodeError::BadArrayItem {
                            array: self.name.clone(),
                            name: child.name.clone(),
                        });
                    }
                    items.push(child.value_at(depth + 1, max_depth)?);
                }
                Ok(Value::Sequence(items))
            }
            WireType::Map => {
                let mut entries = Vec::with_capacity(self.children.len());
                for child in &self.children {
                    let (k, v) = child.map_item()?;
                    let k = k.value_at(depth + 1, max_depth)?;
                    let v = v.value_at(depth + 1, max_depth)?;
                    Value::map_insert(&mut entries, k, v);
                }
                Ok(Value::Map(entries))
            }
        }
    }
}
