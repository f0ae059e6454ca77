//! Native values accepted by the encoder.
//!
//! [`Native`] is the closed set of shapes the encoder understands. Records
//! are ordered lists of [`NativeField`]s, each carrying the [`Directive`]
//! that controls its wire name and whether it is written at all.

use std::borrow::Cow;

use crate::util::Timestamp;

/// Per-field serialization directive: `wireName[,option...]`.
///
/// Options: `omitempty` skips the field on encode when its value is empty;
/// `in` marks a decode-only field that is never encoded. The wire name `-`
/// excludes the field everywhere. An empty wire name falls back to the
/// field's declared identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Name written on the wire.
    pub name: String,
    /// Skip on encode when the value is empty.
    pub omit_empty: bool,
    /// Decode-only; never encoded.
    pub input_only: bool,
    /// Excluded from both encode and projection.
    pub excluded: bool,
}

impl Directive {
    /// Parses a directive string for the field declared as `ident`.
    pub fn parse(ident: &str, directive: &str) -> Self {
        let mut parts = directive.split(',');
        let name = parts.next().unwrap_or("");
        let mut parsed = Self::named(if name.is_empty() { ident } else { name });
        parsed.excluded = name == "-";
        for option in parts {
            match option.trim() {
                "omitempty" => parsed.omit_empty = true,
                "in" => parsed.input_only = true,
                _ => {}
            }
        }
        parsed
    }

    /// A plain directive with just a wire name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            omit_empty: false,
            input_only: false,
            excluded: false,
        }
    }

    /// Returns true if the encoder never writes this field.
    pub fn skips_encode(&self) -> bool {
        self.excluded || self.input_only
    }
}

/// A named record field ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeField<'a> {
    pub directive: Cow<'a, Directive>,
    pub value: Native<'a>,
}

impl<'a> NativeField<'a> {
    /// A field written under `name` with no options.
    pub fn named(name: impl Into<String>, value: impl Into<Native<'a>>) -> Self {
        Self {
            directive: Cow::Owned(Directive::named(name)),
            value: value.into(),
        }
    }

    /// A field declared as `ident` with a directive string.
    pub fn with_directive(ident: &str, directive: &str, value: impl Into<Native<'a>>) -> Self {
        Self {
            directive: Cow::Owned(Directive::parse(ident, directive)),
            value: value.into(),
        }
    }

    /// Returns true if the encoder must skip this field.
    pub fn skipped(&self) -> bool {
        self.directive.skips_encode() || (self.directive.omit_empty && self.value.is_empty())
    }
}

/// A native value to encode.
///
/// Every scalar keeps its exact width, so the encoder can tag it precisely.
/// `Sequence` and `Map` exist so that such fields can be declared, but the
/// encoder rejects them.
#[derive(Debug, Clone, PartialEq)]
pub enum Native<'a> {
    /// Absent value; encodes as a nil element.
    Null,
    String(Cow<'a, str>),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Timestamp(Timestamp),
    /// Fields in declaration order.
    Record(Vec<NativeField<'a>>),
    Sequence(Vec<Native<'a>>),
    Map(Vec<(Native<'a>, Native<'a>)>),
}

impl Native<'_> {
    /// Returns true for the zero value of the variant's kind.
    ///
    /// Timestamps and records are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Native::Null => true,
            Native::String(s) => s.is_empty(),
            Native::Bool(b) => !b,
            Native::I8(v) => *v == 0,
            Native::I16(v) => *v == 0,
            Native::I32(v) => *v == 0,
            Native::I64(v) => *v == 0,
            Native::U8(v) => *v == 0,
            Native::U16(v) => *v == 0,
            Native::U32(v) => *v == 0,
            Native::U64(v) => *v == 0,
            Native::F32(v) => *v == 0.0,
            Native::F64(v) => *v == 0.0,
            Native::Timestamp(_) => false,
            Native::Record(_) => false,
            Native::Sequence(items) => items.is_empty(),
            Native::Map(entries) => entries.is_empty(),
        }
    }

    /// Short name of the variant's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Native::Null => "null",
            Native::String(_) => "string",
            Native::Bool(_) => "bool",
            Native::I8(_) => "i8",
            Native::I16(_) => "i16",
            Native::I32(_) => "i32",
            Native::I64(_) => "i64",
            Native::U8(_) => "u8",
            Native::U16(_) => "u16",
            Native::U32(_) => "u32",
            Native::U64(_) => "u64",
            Native::F32(_) => "f32",
            Native::F64(_) => "f64",
            Native::Timestamp(_) => "timestamp",
            Native::Record(_) => "record",
            Native::Sequence(_) => "slices and arrays",
            Native::Map(_) => "maps",
        }
    }
}

impl<'a> From<&'a str> for Native<'a> {
    fn from(s: &'a str) -> Self {
        Native::String(Cow::Borrowed(s))
    }
}

impl From<String> for Native<'_> {
    fn from(s: String) -> Self {
        Native::String(Cow::Owned(s))
    }
}

impl From<Timestamp> for Native<'_> {
    fn from(t: Timestamp) -> Self {
        Native::Timestamp(t)
    }
}

macro_rules! native_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Native<'_> {
                fn from(v: $ty) -> Self {
                    Native::$variant(v)
                }
            }
        )*
    };
}

native_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_parse() {
        let d = Directive::parse("name", "");
        assert_eq!(d, Directive::named("name"));

        let d = Directive::parse("name", "Name,omitempty");
        assert_eq!(d.name, "Name");
        assert!(d.omit_empty && !d.input_only && !d.excluded);

        let d = Directive::parse("token", ",in");
        assert_eq!(d.name, "token");
        assert!(d.input_only);
        assert!(d.skips_encode());

        let d = Directive::parse("secret", "-");
        assert!(d.excluded);
        assert!(d.skips_encode());
    }

    #[test]
    fn test_in_option_is_a_whole_token() {
        let d = Directive::parse("x", "X,inline");
        assert!(!d.input_only);
        let d = Directive::parse("x", "X,omitempty,in");
        assert!(d.input_only && d.omit_empty);
    }

    #[test]
    fn test_is_empty() {
        assert!(Native::Null.is_empty());
        assert!(Native::from("").is_empty());
        assert!(!Native::from("x").is_empty());
        assert!(Native::from(false).is_empty());
        assert!(Native::from(0u16).is_empty());
        assert!(Native::from(-0.0f64).is_empty());
        assert!(!Native::from(Timestamp::default()).is_empty());
        assert!(!Native::Record(vec![]).is_empty());
        assert!(Native::Sequence(vec![]).is_empty());
    }

    #[test]
    fn test_field_skipped() {
        assert!(NativeField::with_directive("b", "B,omitempty", 0i32).skipped());
        assert!(!NativeField::with_directive("b", "B,omitempty", 1i32).skipped());
        assert!(!NativeField::named("b", 0i32).skipped());
        assert!(NativeField::with_directive("b", "-", 1i32).skipped());
    }
}
