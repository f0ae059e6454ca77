//! SOAP element codec: typed values to self-describing element trees and back.
//!
//! Every element on a SOAP-encoded wire carries its own type tag (`xsi:type`),
//! so a receiver can read a document without a schema. This crate converts
//! between native Rust values and such element trees.
//!
//! # Overview
//!
//! - **Encode**: any scalar, timestamp or declared record becomes an
//!   [`Element`] tagged with the exact wire type of its width
//! - **Decode**: [`Element::value`] turns a tree into a dynamic [`Value`]
//! - **Project**: [`project`] fills a declared record from a tree, either
//!   strictly (exact wire types, every field present) or leniently
//!   (best-effort text coercion, missing fields reset)
//!
//! # Quick Start
//!
//! ```rust
//! use soap_codec::{Value, encode_record, project, soap_record};
//!
//! soap_record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Call {
//!         pub method: String => "Method",
//!         pub retries: u8 => "Retries,omitempty",
//!     }
//! }
//!
//! let call = Call { method: "Ping".into(), retries: 2 };
//!
//! // Encode to an element tree
//! let element = encode_record("Call", &call).unwrap();
//! assert_eq!(element.wire_type, "SOAP-ENC:Struct");
//! assert_eq!(element.children[1].wire_type, "xsd:unsignedByte");
//!
//! // Decode without a target type
//! let Value::Record(fields) = element.value().unwrap() else { unreachable!() };
//! assert_eq!(fields["Method"], Value::from("Ping"));
//! assert_eq!(fields["Retries"], Value::Uint64(2));
//!
//! // Project back onto the record
//! let mut back = Call::default();
//! project(&element, &mut back, true).unwrap();
//! assert_eq!(back, call);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (Element, WireType, Value, Native, records)
//! - [`codec`]: Encoder, getters and projector
//! - [`node`]: Bridge from an external XML parser's nodes
//! - [`fault`]: Protocol fault record
//! - [`error`]: Error types
//! - [`limits`]: Decode limits and wire constants
//!
//! # Security
//!
//! Recursive walks over element trees are bounded by [`limits::MAX_DEPTH`].
//! Malformed text, wrong children and unknown type tags are reported as
//! errors, never panics.
//!
//! # Wire Format
//!
//! Scalars are tagged `xsd:<type>`, records `SOAP-ENC:Struct`, sequences
//! `SOAP-ENC:Array` and maps `SOAP-ENC:Map`. Tag comparisons ignore the
//! namespace prefix. Nil elements carry `xsi:nil="true"` and no type.

pub mod codec;
pub mod error;
pub mod fault;
pub mod limits;
pub mod model;
pub mod node;
pub mod util;

// Re-export commonly used types at crate root
pub use codec::{ProjectOptions, encode, encode_field, encode_record, project, project_with};
pub use error::{DecodeError, EncodeError, ErrorKind, ProjectError};
pub use fault::Fault;
pub use model::{
    Directive, Element, Field, FieldKind, FieldSpec, FloatWidth, IntWidth, Native, NativeField,
    Record, RecordSchema, Value, WireType,
};
pub use node::Node;
pub use util::{DateTimeParseError, Timestamp};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
