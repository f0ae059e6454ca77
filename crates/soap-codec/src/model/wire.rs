//! Wire type vocabulary.
//!
//! The closed set of type tags an element can carry. Tags are compared after
//! stripping any namespace prefix, so `xsd:int` and `int` name the same type.

use std::fmt;

use crate::limits::{SOAP_ENC_PREFIX, XSD_PREFIX};

/// Strips a namespace prefix up to and including the first `:`.
pub fn strip_ns(s: &str) -> &str {
    match s.find(':') {
        Some(i) => &s[i + 1..],
        None => s,
    }
}

/// Bit width of an integer wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Creates a width from a bit count.
    pub fn from_bits(bits: u32) -> Option<IntWidth> {
        match bits {
            8 => Some(IntWidth::W8),
            16 => Some(IntWidth::W16),
            32 => Some(IntWidth::W32),
            64 => Some(IntWidth::W64),
            _ => None,
        }
    }

    /// Returns the bit count.
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    /// Native signed type name for this width.
    pub fn signed_name(self) -> &'static str {
        match self {
            IntWidth::W8 => "i8",
            IntWidth::W16 => "i16",
            IntWidth::W32 => "i32",
            IntWidth::W64 => "i64",
        }
    }

    /// Native unsigned type name for this width.
    pub fn unsigned_name(self) -> &'static str {
        match self {
            IntWidth::W8 => "u8",
            IntWidth::W16 => "u16",
            IntWidth::W32 => "u32",
            IntWidth::W64 => "u64",
        }
    }
}

/// Precision of a floating point wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

impl FloatWidth {
    /// Native type name for this width.
    pub fn name(self) -> &'static str {
        match self {
            FloatWidth::W32 => "f32",
            FloatWidth::W64 => "f64",
        }
    }
}

/// Wire type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    String,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
    UnsignedLong,
    Float,
    Double,
    DateTime,
    /// Record: children are named fields.
    Struct,
    /// Sequence: children are all named `item`.
    Array,
    /// Associative map: children are `item`s holding `key` and `value`.
    Map,
}

impl WireType {
    /// Every wire type, primitives first.
    pub const ALL: [WireType; 16] = [
        WireType::String,
        WireType::Boolean,
        WireType::Byte,
        WireType::Short,
        WireType::Int,
        WireType::Long,
        WireType::UnsignedByte,
        WireType::UnsignedShort,
        WireType::UnsignedInt,
        WireType::UnsignedLong,
        WireType::Float,
        WireType::Double,
        WireType::DateTime,
        WireType::Struct,
        WireType::Array,
        WireType::Map,
    ];

    /// Looks up a wire type from a tag, ignoring any namespace prefix.
    pub fn from_tag(tag: &str) -> Option<WireType> {
        match strip_ns(tag) {
            "string" => Some(WireType::String),
            "boolean" => Some(WireType::Boolean),
            "byte" => Some(WireType::Byte),
            "short" => Some(WireType::Short),
            "int" => Some(WireType::Int),
            "long" => Some(WireType::Long),
            "unsignedByte" => Some(WireType::UnsignedByte),
            "unsignedShort" => Some(WireType::UnsignedShort),
            "unsignedInt" => Some(WireType::UnsignedInt),
            "unsignedLong" => Some(WireType::UnsignedLong),
            "float" => Some(WireType::Float),
            "double" => Some(WireType::Double),
            "dateTime" => Some(WireType::DateTime),
            "Struct" => Some(WireType::Struct),
            "Array" => Some(WireType::Array),
            "Map" => Some(WireType::Map),
            _ => None,
        }
    }

    /// Returns the unqualified tag (e.g., "unsignedInt").
    pub fn local_name(self) -> &'static str {
        match self {
            WireType::String => "string",
            WireType::Boolean => "boolean",
            WireType::Byte => "byte",
            WireType::Short => "short",
            WireType::Int => "int",
            WireType::Long => "long",
            WireType::UnsignedByte => "unsignedByte",
            WireType::UnsignedShort => "unsignedShort",
            WireType::UnsignedInt => "unsignedInt",
            WireType::UnsignedLong => "unsignedLong",
            WireType::Float => "float",
            WireType::Double => "double",
            WireType::DateTime => "dateTime",
            WireType::Struct => "Struct",
            WireType::Array => "Array",
            WireType::Map => "Map",
        }
    }

    /// Returns the tag as written on the wire (e.g., "xsd:int", "SOAP-ENC:Struct").
    pub fn qualified_name(self) -> String {
        let prefix = if self.is_compound() { SOAP_ENC_PREFIX } else { XSD_PREFIX };
        format!("{}:{}", prefix, self.local_name())
    }

    /// Returns true for Struct, Array and Map.
    pub fn is_compound(self) -> bool {
        matches!(self, WireType::Struct | WireType::Array | WireType::Map)
    }

    /// Signed integer tag for a width.
    pub fn for_int(width: IntWidth) -> WireType {
        match width {
            IntWidth::W8 => WireType::Byte,
            IntWidth::W16 => WireType::Short,
            IntWidth::W32 => WireType::Int,
            IntWidth::W64 => WireType::Long,
        }
    }

    /// Unsigned integer tag for a width.
    pub fn for_uint(width: IntWidth) -> WireType {
        match width {
            IntWidth::W8 => WireType::UnsignedByte,
            IntWidth::W16 => WireType::UnsignedShort,
            IntWidth::W32 => WireType::UnsignedInt,
            IntWidth::W64 => WireType::UnsignedLong,
        }
    }

    /// Floating point tag for a precision.
    pub fn for_float(width: FloatWidth) -> WireType {
        match width {
            FloatWidth::W32 => WireType::Float,
            FloatWidth::W64 => WireType::Double,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}
