//! Decode limits and wire constants.
//!
//! Element trees may come from untrusted documents. Recursive walks
//! (`Element::value`, `Element::from_node`) stop at [`MAX_DEPTH`].

/// Maximum element tree depth accepted by recursive decoding.
pub const MAX_DEPTH: usize = 256;

/// Namespace prefix written on primitive wire type tags.
pub const XSD_PREFIX: &str = "xsd";

/// Namespace prefix written on compound wire type tags.
pub const SOAP_ENC_PREFIX: &str = "SOAP-ENC";

/// Qualified name of the type attribute.
pub const XSI_TYPE: &str = "xsi:type";

/// Qualified name of the nil attribute.
pub const XSI_NIL: &str = "xsi:nil";

/// Child name required for sequence and map entries.
pub const ITEM: &str = "item";

/// Child name of a map entry's key.
pub const ITEM_KEY: &str = "key";

/// Child name of a map entry's value.
pub const ITEM_VALUE: &str = "value";
