//! The tagged tree node.
//!
//! An [`Element`] models one XML/SOAP value: a tag name, a wire type tag, a
//! nil flag, a text payload and ordered children. The type tag travels with
//! the node, so a receiver can decode a document without a schema.

use crate::model::wire::{WireType, strip_ns};

/// One SOAP data element.
///
/// Elements are built by the encoder or converted from a parsed document and
/// are not mutated afterwards. When `nil` is set, `wire_type`, `text` and
/// `children` carry no value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name; may be namespace-qualified.
    pub name: String,
    /// Wire type tag (e.g., "xsd:int"), or empty.
    pub wire_type: String,
    /// Explicit null marker.
    pub nil: bool,
    /// Scalar payload in textual form.
    pub text: String,
    /// Record fields, sequence items or map entries.
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an untyped, empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a nil element.
    pub fn nil(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nil: true,
            ..Self::default()
        }
    }

    /// Creates a scalar element tagged with the qualified name of `wire_type`.
    pub fn scalar(name: impl Into<String>, wire_type: WireType, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wire_type: wire_type.qualified_name(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Creates a compound element tagged with the qualified name of `wire_type`.
    pub fn compound(name: impl Into<String>, wire_type: WireType, children: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            wire_type: wire_type.qualified_name(),
            children,
            ..Self::default()
        }
    }

    /// Creates a map entry: an `item` holding a `key` and a `value`.
    pub fn map_entry(key: Element, value: Element) -> Self {
        Self::new("item").with_child(key).with_child(value)
    }

    /// Sets the raw type tag.
    pub fn with_type(mut self, wire_type: impl Into<String>) -> Self {
        self.wire_type = wire_type.into();
        self
    }

    /// Sets the text payload.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Tag name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        strip_ns(&self.name)
    }

    /// Type tag without any namespace prefix.
    pub fn local_type(&self) -> &str {
        strip_ns(&self.wire_type)
    }

    /// Resolves the type tag against the vocabulary.
    pub fn wire(&self) -> Option<WireType> {
        WireType::from_tag(&self.wire_type)
    }

    /// Returns true if the type tag is `Struct`.
    pub fn is_record(&self) -> bool {
        self.wire() == Some(WireType::Struct)
    }

    /// Returns true if the type tag is `Array`.
    pub fn is_sequence(&self) -> bool {
        self.wire() == Some(WireType::Array)
    }

    /// Returns true if the type tag is `Map`.
    pub fn is_map(&self) -> bool {
        self.wire() == Some(WireType::Map)
    }

    /// Returns true if the element has children, i.e. cannot hold a scalar.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Maximum depth of the tree rooted here; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Element::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let e = Element::scalar("Age", WireType::Int, "42");
        assert_eq!(e.wire_type, "xsd:int");
        assert_eq!(e.local_type(), "int");
        assert_eq!(e.wire(), Some(WireType::Int));
        assert!(!e.nil);

        let n = Element::nil("Gone");
        assert!(n.nil);
        assert!(n.wire_type.is_empty());
        assert_eq!(n.wire(), None);
    }

    #[test]
    fn test_shapes() {
        let rec = Element::compound("r", WireType::Struct, vec![]);
        assert!(rec.is_record() && !rec.is_map() && !rec.is_sequence());

        let map = Element::new("m").with_type("Map");
        assert!(map.is_map());

        let seq = Element::new("s").with_type("enc:Array");
        assert!(seq.is_sequence());
    }

    #[test]
    fn test_depth() {
        let leaf = Element::scalar("x", WireType::String, "v");
        assert_eq!(leaf.depth(), 1);
        let tree = Element::compound(
            "a",
            WireType::Struct,
            vec![Element::compound("b", WireType::Struct, vec![leaf.clone()]), leaf],
        );
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(Element::new("ns1:getUser").local_name(), "getUser");
        assert_eq!(Element::new("getUser").local_name(), "getUser");
    }
}
