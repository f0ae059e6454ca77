//! Bridge to an external tree parser.
//!
//! The codec does not parse XML. Any parser whose nodes expose a tag, their
//! attributes, text and children can implement [`Node`]; [`Element::from_node`]
//! then reads the type and nil attributes into an [`Element`] tree. Going the
//! other way, [`Element::attributes`] lists the attributes a serializer writes.

use crate::error::DecodeError;
use crate::limits::{MAX_DEPTH, XSI_NIL, XSI_TYPE};
use crate::model::Element;
use crate::model::wire::strip_ns;

/// A parsed tree node.
pub trait Node {
    /// Tag name, possibly namespace-qualified.
    fn tag(&self) -> &str;

    /// Value of the attribute whose local name is `local_name`, whatever its prefix.
    fn attribute(&self, local_name: &str) -> Option<&str>;

    /// Character content.
    fn text(&self) -> &str;

    /// Child nodes in document order.
    fn children(&self) -> impl Iterator<Item = &Self>;
}

fn parse_nil(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

impl Element {
    /// Builds an element tree from a parsed node, up to [`MAX_DEPTH`] levels deep.
    pub fn from_node<N: Node>(node: &N) -> Result<Element, DecodeError> {
        Self::from_node_with_limit(node, MAX_DEPTH)
    }

    /// [`from_node`](Self::from_node) with an explicit depth limit.
    pub fn from_node_with_limit<N: Node>(node: &N, max_depth: usize) -> Result<Element, DecodeError> {
        Self::from_node_at(node, 1, max_depth)
    }

    fn from_node_at<N: Node>(node: &N, depth: usize, max_depth: usize) -> Result<Element, DecodeError> {
        if depth > max_depth {
            return Err(DecodeError::DepthExceedsLimit { max: max_depth });
        }
        let mut children = Vec::new();
        for child in node.children() {
            children.push(Self::from_node_at(child, depth + 1, max_depth)?);
        }
        Ok(Element {
            name: node.tag().to_string(),
            wire_type: node.attribute("type").unwrap_or_default().to_string(),
            nil: node.attribute("nil").is_some_and(parse_nil),
            text: node.text().to_string(),
            children,
        })
    }

    /// Attributes a serializer writes for this element: the type tag when
    /// set and the nil flag when true.
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attrs = Vec::with_capacity(2);
        if !self.wire_type.is_empty() {
            attrs.push((XSI_TYPE, self.wire_type.as_str()));
        }
        if self.nil {
            attrs.push((XSI_NIL, "true"));
        }
        attrs
    }
}

impl Node for Element {
    fn tag(&self) -> &str {
        &self.name
    }

    fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes()
            .into_iter()
            .find(|(name, _)| strip_ns(name) == local_name)
            .map(|(_, value)| value)
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }
}
