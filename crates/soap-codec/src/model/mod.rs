//! Data model types for the SOAP element codec.
//!
//! This module contains:
//! - The wire type vocabulary
//! - Elements (tagged tree nodes)
//! - Decoded values
//! - Native values and field directives (encoder input)
//! - Declared records

pub mod element;
pub mod native;
pub mod record;
pub mod value;
pub mod wire;

pub use element::Element;
pub use native::{Directive, Native, NativeField};
pub use record::{Field, FieldKind, FieldSpec, Record, RecordSchema};
pub use value::Value;
pub use wire::{FloatWidth, IntWidth, WireType, strip_ns};
