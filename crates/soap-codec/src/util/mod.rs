//! Text renderings shared by the encoder and the getters.

pub mod datetime;
pub mod float;

pub use datetime::{DateTimeParseError, Timestamp};
