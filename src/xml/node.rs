/// Owned XML node types.
///
/// Elements keep their qualified names (`w:p`, `a:blip`) and attribute order
/// exactly as parsed. Lookups go through local names so the tree is agnostic
/// to prefix aliasing.

/// A node in the owned XML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element with attributes and children
    Element(XmlElement),
    /// A text node (entities already decoded)
    Text(String),
}

impl XmlNode {
    /// Get the node as an element, if it is one.
    #[inline]
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        }
    }

    /// Get the node as a mutable element, if it is one.
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        }
    }
}

/// An XML element with a qualified name, ordered attributes, and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name as written in the source, e.g. `w:p`
    pub name: String,
    /// Attributes in source order, qualified name -> decoded value
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

/// Strip the namespace prefix from a qualified name.
#[inline]
pub fn local_name(qname: &str) -> &str {
    match qname.rfind(':') {
        Some(pos) => &qname[pos + 1..],
        None => qname,
    }
}

impl XmlElement {
    /// Create a new element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Check whether this element's local name matches.
    #[inline]
    pub fn is(&self, local: &str) -> bool {
        local_name(&self.name) == local
    }

    /// Get an attribute value by local name.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| local_name(k) == local)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing attribute with the same
    /// qualified name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attrs.iter_mut().find(|(k, _)| *k == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Append a child node.
    #[inline]
    pub fn push(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    /// Append a child element.
    #[inline]
    pub fn push_element(&mut self, el: XmlElement) {
        self.children.push(XmlNode::Element(el));
    }

    /// Builder-style child element append.
    pub fn with_child(mut self, el: XmlElement) -> Self {
        self.push_element(el);
        self
    }

    /// Builder-style text child append.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Find the first child element with the given local name.
    pub fn find(&self, local: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .filter_map(XmlNode::as_element)
            .find(|el| el.is(local))
    }

    /// Find the first child element with the given local name, mutably.
    pub fn find_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.children
            .iter_mut()
            .filter_map(XmlNode::as_element_mut)
            .find(|el| el.is(local))
    }

    /// Iterate over child elements with the given local name.
    pub fn elements<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children
            .iter()
            .filter_map(XmlNode::as_element)
            .filter(move |el| el.is(local))
    }

    /// Iterate over all child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Find the first descendant element with the given local name,
    /// depth-first.
    pub fn descendant(&self, local: &str) -> Option<&XmlElement> {
        for child in self.children.iter().filter_map(XmlNode::as_element) {
            if child.is(local) {
                return Some(child);
            }
            if let Some(found) = child.descendant(local) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }
}
