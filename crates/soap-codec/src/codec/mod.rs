//! Conversions between native values and element trees.
//!
//! - [`encode`]: native value to element tree
//! - [`access`]: typed getters, lookups and dynamic decode on [`Element`](crate::Element)
//! - [`project`]: element tree onto a declared record

pub mod access;
pub mod encode;
pub mod project;

pub use encode::{encode, encode_field, encode_record};
pub use project::{ProjectOptions, project, project_with};
