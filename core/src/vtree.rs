//! The virtual tree model.
//!
//! A [`VTree`] is an immutable, shareable description of one node. Updates are
//! expressed by emitting a new tree on a [`Source`], never by mutating one in
//! place. The only live handles a tree may carry are dynamic attribute values,
//! which are themselves [`Source`]s supplied by the caller.

use indexmap::IndexMap;

use crate::Source;

/// A virtual node: either an element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum VTree {
    /// An element with a tag, attributes and children.
    Element(Element),
    /// A text node.
    Text(String),
}

impl VTree {
    /// Creates a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns `true` for text nodes.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns the element if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Returns the tag name of an element node.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(Element::tag)
    }
}

impl From<Element> for VTree {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<&str> for VTree {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for VTree {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The value bound to an attribute.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// A plain value.
    Static(String),
    /// A value that changes over time.
    ///
    /// On custom elements this becomes a reactive prop; on plain elements the
    /// resolver substitutes the latest value before serialization.
    Dynamic(Source<String>),
}

impl AttrValue {
    /// Returns the plain value, if this attribute is static.
    #[must_use]
    pub fn as_static(&self) -> Option<&str> {
        match self {
            Self::Static(value) => Some(value),
            Self::Dynamic(_) => None,
        }
    }

    /// Returns `true` if the value is a reactive source.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => a == b,
            (Self::Dynamic(a), Self::Dynamic(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Static(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Static(value)
    }
}

impl From<Source<String>> for AttrValue {
    fn from(value: Source<String>) -> Self {
        Self::Dynamic(value)
    }
}

/// Attributes in declaration order.
pub type Attributes = IndexMap<String, AttrValue>;

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Attributes,
    children: Vec<VTree>,
}

impl Element {
    /// Creates an element with no attributes and no children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Reassembles an element from its parts.
    #[must_use]
    pub const fn from_parts(tag: String, attributes: Attributes, children: Vec<VTree>) -> Self {
        Self {
            tag,
            attributes,
            children,
        }
    }

    /// Splits the element into tag, attributes and children.
    #[must_use]
    pub fn into_parts(self) -> (String, Attributes, Vec<VTree>) {
        (self.tag, self.attributes, self.children)
    }

    /// Sets an attribute. Setting an existing name replaces its value in place.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Binds an attribute to a reactive source.
    #[must_use]
    pub fn with_dynamic_attribute(self, name: impl Into<String>, source: Source<String>) -> Self {
        self.with_attribute(name, AttrValue::Dynamic(source))
    }

    /// Appends a child.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<VTree>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends several children in order.
    #[must_use]
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VTree>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// The tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The attributes in declaration order.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Looks up one attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// The children in order.
    #[must_use]
    pub fn children(&self) -> &[VTree] {
        &self.children
    }
}
