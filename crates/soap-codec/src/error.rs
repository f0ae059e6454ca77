//! Error types for element encoding, decoding and record projection.

use thiserror::Error;

/// Error classes for decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Strict accessor called on an element of a different wire type.
    TypeMismatch,
    /// Text payload does not parse as the requested kind.
    MalformedText,
    /// Sequence or map element with wrong children.
    Structural,
    /// Input exceeds a decode limit.
    Limit,
}

impl ErrorKind {
    /// Returns a short stable label (e.g., "type-mismatch").
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::MalformedText => "malformed-text",
            ErrorKind::Structural => "structural",
            ErrorKind::Limit => "limit",
        }
    }
}

/// Error while reading a value out of an element tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    // === Type mismatch ===
    #[error("soap: element of type '{actual}' but '{expected}' expected")]
    TypeMismatch { actual: String, expected: &'static str },

    #[error("soap: can't get value from nil Struct/Map '{name}'")]
    NilContainer { name: String },

    #[error("soap: unknown type: '{wire_type}'")]
    UnknownType { wire_type: String },

    // === Malformed text ===
    /// `target` is either a wire type (`wire:int`) or a native type (`native:i32`).
    #[error("soap: bad value '{text}' for type {target}")]
    BadValue { text: String, target: String },

    // === Structural ===
    #[error("soap: bad element '{name}' in array '{array}'")]
    BadArrayItem { array: String, name: String },

    #[error("soap: element '{name}' isn't a map item")]
    NotMapItem { name: String },

    #[error("soap: bad number of children in map item: {count}")]
    MapItemArity { count: usize },

    #[error("soap: map item without a key")]
    MapItemWithoutKey,

    #[error("soap: map item without a value")]
    MapItemWithoutValue,

    // === Limits ===
    #[error("soap: element tree depth exceeds maximum {max}")]
    DepthExceedsLimit { max: usize },
}

impl DecodeError {
    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::TypeMismatch { .. }
            | DecodeError::NilContainer { .. }
            | DecodeError::UnknownType { .. } => ErrorKind::TypeMismatch,
            DecodeError::BadValue { .. } => ErrorKind::MalformedText,
            DecodeError::DepthExceedsLimit { .. } => ErrorKind::Limit,
            _ => ErrorKind::Structural,
        }
    }
}

/// Error while building an element tree from a native value.
///
/// Sequences and maps are outside the encodable universe; every other native
/// shape is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("soap: {kind} not implemented (element '{name}')")]
    UnsupportedKind { name: String, kind: &'static str },
}

/// Error while projecting an element onto a declared record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    #[error("soap: there is no field of name '{field}'")]
    MissingField { field: String },

    #[error("soap: unsupported field type {kind} for field '{field}'")]
    UnsupportedFieldType { field: String, kind: &'static str },

    #[error("soap: field '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: DecodeError,
    },

    #[error("soap: can't project element '{name}': {source}")]
    NotAContainer {
        name: String,
        #[source]
        source: DecodeError,
    },
}

impl ProjectError {
    /// Returns the wire name of the field that failed, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ProjectError::MissingField { field }
            | ProjectError::UnsupportedFieldType { field, .. }
            | ProjectError::Field { field, .. } => Some(field),
            ProjectError::NotAContainer { .. } => None,
        }
    }

    /// Returns true if the error comes from the record declaration rather than
    /// the wire data; retrying with other input cannot succeed.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ProjectError::UnsupportedFieldType { .. })
    }
}
