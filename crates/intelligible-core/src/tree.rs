//! The element tree: in-memory form of every document.
//!
//! Callers describe fragments in the object notation used by persisted
//! documents: keys starting with `@` are attributes, the `#` key holds text
//! (or nested content), and every other key is a child element. Arrays stand
//! for repeated siblings with the same name.

use serde_json::{Map, Value};

use crate::error::DocumentError;

/// Prefix marking an attribute key in object notation.
pub const ATTR_PREFIX: char = '@';

/// Key holding text (or nested content) in object notation.
pub const TEXT_KEY: &str = "#";

/// Name of the identifier attribute.
pub const EID_ATTR: &str = "eId";

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in insertion order. Serialization keeps this order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style text append.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// The `eId` attribute, if any.
    pub fn eid(&self) -> Option<&str> {
        self.attr(EID_ATTR)
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append text. Empty text is ignored; adjacent text merges.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(&text),
            _ => self.children.push(Node::Text(text)),
        }
    }

    /// Replace all text children with `text`, keeping element children.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.retain(|n| matches!(n, Node::Element(_)));
        let text = text.into();
        if !text.is_empty() {
            self.children.insert(0, Node::Text(text));
        }
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Mutable access to the first child element with the given name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Remove and return the first child element with the given name.
    pub fn remove_child(&mut self, name: &str) -> Option<Element> {
        let index = self
            .children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.name == name))?;
        match self.children.remove(index) {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Whether any child is an element.
    pub fn has_element_children(&self) -> bool {
        self.children.iter().any(|n| matches!(n, Node::Element(_)))
    }

    /// Build elements named `name` from an object-notation value.
    ///
    /// An array yields one element per item; anything else yields exactly one.
    pub fn from_object(name: &str, value: &Value) -> Result<Vec<Element>, DocumentError> {
        match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.extend(Self::from_object(name, item)?);
                }
                Ok(out)
            }
            other => {
                if !is_xml_name(name) {
                    return Err(DocumentError::fragment(name, "not a valid element name"));
                }
                let mut element = Element::new(name);
                element.fill(other)?;
                Ok(vec![element])
            }
        }
    }

    /// Add object-notation content to this element.
    fn fill(&mut self, value: &Value) -> Result<(), DocumentError> {
        match value {
            Value::Null => {}
            Value::Bool(b) => self.push_text(b.to_string()),
            Value::Number(n) => self.push_text(n.to_string()),
            Value::String(s) => self.push_text(s.as_str()),
            Value::Array(items) => {
                for item in items {
                    self.fill(item)?;
                }
            }
            Value::Object(map) => {
                for (key, v) in map {
                    if let Some(attr) = key.strip_prefix(ATTR_PREFIX) {
                        if !is_xml_name(attr) {
                            return Err(DocumentError::fragment(
                                format!("{}/{}", self.name, key),
                                "not a valid attribute name",
                            ));
                        }
                        let value = scalar_text(v).ok_or_else(|| {
                            DocumentError::fragment(
                                format!("{}/{}", self.name, key),
                                "attribute values must be scalars",
                            )
                        })?;
                        self.set_attr(attr, value);
                    } else if key == TEXT_KEY {
                        self.fill(v)?;
                    } else {
                        for child in Self::from_object(key, v)? {
                            self.push_child(child);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Convert this subtree back to object notation.
    ///
    /// An element with only text and no attributes becomes a plain string;
    /// an empty element becomes an empty object. Repeated child names are
    /// grouped into arrays in first-occurrence order.
    pub fn to_object(&self) -> Value {
        let text = self.text();
        if self.attributes.is_empty() && !self.has_element_children() {
            return if text.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::String(text)
            };
        }

        let mut map = Map::new();
        for (k, v) in &self.attributes {
            map.insert(format!("{ATTR_PREFIX}{k}"), Value::String(v.clone()));
        }
        for child in self.elements() {
            let value = child.to_object();
            match map.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(child.name.clone(), value);
                }
            }
        }
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(text));
        }
        Value::Object(map)
    }
}

/// Letters, digits, `_`, `-`, `.` and `:`, not starting with a digit, `-`
/// or `.`.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
