//! Declared record types.
//!
//! A record type describes its fields once, in a [`RecordSchema`] built on
//! first use: the field identifier, the parsed [`Directive`] and the native
//! [`FieldKind`]. The encoder and projector walk that table instead of
//! inspecting types at runtime.
//!
//! Records are normally declared with [`soap_record!`](crate::soap_record):
//!
//! ```rust
//! use soap_codec::{encode_record, project, soap_record};
//!
//! soap_record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Account {
//!         pub login: String => "Login",
//!         pub balance: i64 => "Balance,omitempty",
//!         pub password: String => "Password,in",
//!     }
//! }
//!
//! let acc = Account { login: "bob".into(), balance: 0, password: "x".into() };
//! let element = encode_record("Account", &acc).unwrap();
//! assert_eq!(element.children.len(), 1);
//!
//! let mut back = Account::default();
//! project(&element, &mut back, false).unwrap();
//! assert_eq!(back.login, "bob");
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::model::native::{Directive, Native, NativeField};
use crate::model::wire::{FloatWidth, IntWidth};
use crate::util::Timestamp;

/// Native kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    Timestamp,
    /// Nested record; encodable, not projectable.
    Record,
    /// Neither encodable nor projectable.
    Sequence,
    /// Neither encodable nor projectable.
    Map,
}

impl FieldKind {
    /// Native type name (e.g., "i32", "record").
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Bool => "bool",
            FieldKind::Int(w) => w.signed_name(),
            FieldKind::Uint(w) => w.unsigned_name(),
            FieldKind::Float(w) => w.name(),
            FieldKind::Timestamp => "Timestamp",
            FieldKind::Record => "record",
            FieldKind::Sequence => "sequence",
            FieldKind::Map => "map",
        }
    }

    /// Returns true if the projector can fill a field of this kind.
    pub fn is_projectable(self) -> bool {
        !matches!(self, FieldKind::Record | FieldKind::Sequence | FieldKind::Map)
    }
}

/// Descriptor of one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field identifier in the native declaration.
    pub ident: &'static str,
    pub directive: Directive,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Creates a descriptor, parsing `directive` against `ident`.
    pub fn new(ident: &'static str, directive: &str, kind: FieldKind) -> Self {
        Self {
            ident,
            directive: Directive::parse(ident, directive),
            kind,
        }
    }

    /// Name the field is written and looked up under.
    pub fn wire_name(&self) -> &str {
        &self.directive.name
    }
}

/// Field descriptor table of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub name: &'static str,
    /// Fields in declaration order.
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }

    /// Finds a field by its wire name.
    pub fn by_wire_name(&self, wire_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.wire_name() == wire_name)
    }
}

/// A native type that can sit in a record field.
pub trait Field: Default {
    /// Kind reported to the projector.
    const KIND: FieldKind;

    /// Borrows the value as an encoder input.
    fn to_native(&self) -> Native<'_>;

    /// Takes a projected value back. Returns None if `native` does not match
    /// [`Self::KIND`].
    fn from_native(native: Native<'_>) -> Option<Self>;
}

/// A declared record type.
pub trait Record: Default {
    /// The descriptor table, built once per type.
    fn schema() -> &'static RecordSchema;

    /// Field values in declaration order, one per schema entry.
    fn field_values(&self) -> Vec<Native<'_>>;

    /// Stores a projected value into the field declared as `ident`.
    ///
    /// Returns false if there is no such field or the value has the wrong kind.
    fn assign(&mut self, ident: &str, value: Native<'_>) -> bool;

    /// Resets the field declared as `ident` to its default.
    fn reset(&mut self, ident: &str) -> bool;

    /// Pairs field values with their directives.
    fn to_native(&self) -> Native<'_> {
        let fields = Self::schema()
            .fields
            .iter()
            .zip(self.field_values())
            .map(|(spec, value)| NativeField {
                directive: Cow::Borrowed(&spec.directive),
                value,
            })
            .collect();
        Native::Record(fields)
    }
}

impl Field for String {
    const KIND: FieldKind = FieldKind::String;

    fn to_native(&self) -> Native<'_> {
        Native::String(Cow::Borrowed(self))
    }

    fn from_native(native: Native<'_>) -> Option<Self> {
        match native {
            Native::String(s) => Some(s.into_owned()),
            _ => None,
        }
    }
}

impl Field for Timestamp {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_native(&self) -> Native<'_> {
        Native::Timestamp(*self)
    }

    fn from_native(native: Native<'_>) -> Option<Self> {
        match native {
            Native::Timestamp(t) => Some(t),
            _ => None,
        }
    }
}

macro_rules! scalar_field {
    ($($ty:ty => $variant:ident, $kind:expr;)*) => {
        $(
            impl Field for $ty {
                const KIND: FieldKind = $kind;

                fn to_native(&self) -> Native<'_> {
                    Native::$variant(*self)
                }

                fn from_native(native: Native<'_>) -> Option<Self> {
                    match native {
                        Native::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

scalar_field! {
    bool => Bool, FieldKind::Bool;
    i8 => I8, FieldKind::Int(IntWidth::W8);
    i16 => I16, FieldKind::Int(IntWidth::W16);
    i32 => I32, FieldKind::Int(IntWidth::W32);
    i64 => I64, FieldKind::Int(IntWidth::W64);
    u8 => U8, FieldKind::Uint(IntWidth::W8);
    u16 => U16, FieldKind::Uint(IntWidth::W16);
    u32 => U32, FieldKind::Uint(IntWidth::W32);
    u64 => U64, FieldKind::Uint(IntWidth::W64);
    f32 => F32, FieldKind::Float(FloatWidth::W32);
    f64 => F64, FieldKind::Float(FloatWidth::W64);
}

/// Absent values encode as nil and count as empty for `omitempty`.
impl<T: Field> Field for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_native(&self) -> Native<'_> {
        match self {
            Some(v) => v.to_native(),
            None => Native::Null,
        }
    }

    fn from_native(native: Native<'_>) -> Option<Self> {
        match native {
            Native::Null => Some(None),
            other => T::from_native(other).map(Some),
        }
    }
}

impl<T: Field> Field for Vec<T> {
    const KIND: FieldKind = FieldKind::Sequence;

    fn to_native(&self) -> Native<'_> {
        Native::Sequence(self.iter().map(Field::to_native).collect())
    }

    fn from_native(native: Native<'_>) -> Option<Self> {
        match native {
            Native::Sequence(items) => items.into_iter().map(T::from_native).collect(),
            _ => None,
        }
    }
}

impl<K: Field + Ord, V: Field> Field for BTreeMap<K, V> {
    const KIND: FieldKind = FieldKind::Map;

    fn to_native(&self) -> Native<'_> {
        Native::Map(self.iter().map(|(k, v)| (k.to_native(), v.to_native())).collect())
    }

    fn from_native(native: Native<'_>) -> Option<Self> {
        match native {
            Native::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_native(k)?, V::from_native(v)?)))
                .collect(),
            _ => None,
        }
    }
}

/// Declares a record struct and implements [`Record`] and [`Field`] for it.
///
/// Each field may carry a directive string after `=>`; without one the wire
/// name is the field identifier. The struct must derive (or implement)
/// `Default`.
#[macro_export]
macro_rules! soap_record {
    (@directive) => { "" };
    (@directive $directive:literal) => { $directive };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $directive:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn schema() -> &'static $crate::RecordSchema {
                static SCHEMA: ::std::sync::OnceLock<$crate::RecordSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::RecordSchema::new(
                        stringify!($name),
                        vec![
                            $(
                                $crate::FieldSpec::new(
                                    stringify!($field),
                                    $crate::soap_record!(@directive $($directive)?),
                                    <$ty as $crate::Field>::KIND,
                                ),
                            )*
                        ],
                    )
                })
            }

            fn field_values(&self) -> Vec<$crate::Native<'_>> {
                vec![$($crate::Field::to_native(&self.$field),)*]
            }

            fn assign(&mut self, ident: &str, value: $crate::Native<'_>) -> bool {
                $(
                    if ident == stringify!($field) {
                        return match <$ty as $crate::Field>::from_native(value) {
                            Some(v) => {
                                self.$field = v;
                                true
                            }
                            None => false,
                        };
                    }
                )*
                let _ = value;
                false
            }

            fn reset(&mut self, ident: &str) -> bool {
                $(
                    if ident == stringify!($field) {
                        self.$field = <$ty as ::std::default::Default>::default();
                        return true;
                    }
                )*
                false
            }
        }

        impl $crate::Field for $name {
            const KIND: $crate::FieldKind = $crate::FieldKind::Record;

            fn to_native(&self) -> $crate::Native<'_> {
                $crate::Record::to_native(self)
            }

            fn from_native(_native: $crate::Native<'_>) -> Option<Self> {
                None
            }
        }
    };
}
