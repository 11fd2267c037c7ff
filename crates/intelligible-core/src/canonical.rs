//! Canonical XML writer.
//!
//! The output of this module is what gets signed, so it must be a pure
//! function of the element tree:
//! - Attributes are written in stored order
//! - Every element starts on its own line, indented two spaces per level
//! - Elements without children are self-closed (`<x/>`)
//! - Text-only elements keep their text inline and untouched
//! - Text mixed with child elements is trimmed onto its own line
//! - No trailing newline
//!
//! [`crate::parse`] reverses this exactly: `parse(canonical_xml(e)) == e`
//! for every tree whose mixed-content text has no surrounding whitespace.

use std::borrow::Cow;

use quick_xml::escape::{escape, partial_escape};

use crate::tree::{Element, Node};

/// Declaration line heading every serialized document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

const INDENT: &str = "  ";

/// Serialize a tree to canonical text, declaration included.
pub fn canonical_xml(root: &Element) -> String {
    let mut buf = String::from(XML_DECLARATION);
    write_element(&mut buf, root, 0);
    buf
}

/// Serialize a subtree without the declaration line.
pub fn canonical_fragment(element: &Element) -> String {
    let mut buf = String::new();
    write_element(&mut buf, element, 0);
    // write_element always opens with a newline
    buf.split_off(1)
}

fn write_element(buf: &mut String, element: &Element, depth: usize) {
    new_line(buf, depth);
    buf.push('<');
    buf.push_str(&element.name);
    for (name, value) in &element.attributes {
        buf.push(' ');
        buf.push_str(name);
        buf.push_str("=\"");
        buf.push_str(&escape_attr(value));
        buf.push('"');
    }

    if element.children.is_empty() {
        buf.push_str("/>");
        return;
    }
    buf.push('>');

    if element.has_element_children() {
        for child in &element.children {
            match child {
                Node::Element(e) => write_element(buf, e, depth + 1),
                Node::Text(t) => {
                    let t = t.trim();
                    if !t.is_empty() {
                        new_line(buf, depth + 1);
                        buf.push_str(&partial_escape(t));
                    }
                }
            }
        }
        new_line(buf, depth);
    } else {
        buf.push_str(&partial_escape(&element.text()));
    }

    buf.push_str("</");
    buf.push_str(&element.name);
    buf.push('>');
}

fn new_line(buf: &mut String, depth: usize) {
    buf.push('\n');
    for _ in 0..depth {
        buf.push_str(INDENT);
    }
}

/// Escape an attribute value.
///
/// Line breaks and tabs become character references so that parsers which
/// normalize attribute whitespace still read back the stored value.
fn escape_attr(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("doc")
            .with_attr("name", "identity")
            .with_child(
                Element::new("preface").with_child(
                    Element::new("longTitle")
                        .with_attr("eId", "preface__longTitle_1")
                        .with_child(Element::new("p").with_text("Alice Identity")),
                ),
            )
            .with_child(Element::new("conclusions").with_attr("eId", "conclusions"))
    }

    #[test]
    fn test_canonical_layout() {
        let expected = concat!(
            "<?xml version=\"1.0\"?>\n",
            "<doc name=\"identity\">\n",
            "  <preface>\n",
            "    <longTitle eId=\"preface__longTitle_1\">\n",
            "      <p>Alice Identity</p>\n",
            "    </longTitle>\n",
            "  </preface>\n",
            "  <conclusions eId=\"conclusions\"/>\n",
            "</doc>",
        );
        assert_eq!(canonical_xml(&sample()), expected);
    }

    #[test]
    fn test_canonical_deterministic() {
        let tree = sample();
        assert_eq!(canonical_xml(&tree), canonical_xml(&tree.clone()));
    }

    #[test]
    fn test_attribute_order_is_stored_order() {
        let a = Element::new("x").with_attr("b", "2").with_attr("a", "1");
        assert_eq!(canonical_fragment(&a), r#"<x b="2" a="1"/>"#);
    }

    #[test]
    fn test_escaping() {
        let element = Element::new("p")
            .with_attr("title", "a \"quoted\" <tag>\nnext")
            .with_text("Tom & Jerry <3");

        assert_eq!(
            canonical_fragment(&element),
            "<p title=\"a &quot;quoted&quot; &lt;tag&gt;&#10;next\">Tom &amp; Jerry &lt;3</p>"
        );
    }

    #[test]
    fn test_mixed_content_text_on_own_line() {
        let element = Element::new("p")
            .with_text("  lead  ")
            .with_child(Element::new("b").with_text("bold"));

        assert_eq!(canonical_fragment(&element), "<p>\n  lead\n  <b>bold</b>\n</p>");
    }

    #[test]
    fn test_no_trailing_newline() {
        assert!(!canonical_xml(&sample()).ends_with('\n'));
    }
}
