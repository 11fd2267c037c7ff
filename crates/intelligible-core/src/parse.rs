//! XML text to element tree.
//!
//! Whitespace between elements is layout, not content: once an element is
//! known to hold child elements its text nodes are trimmed and empty ones
//! dropped. Text-only elements keep their text exactly.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::tree::{Element, Node};

/// Parse a complete XML text into its root element.
pub fn parse_element(text: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::Xml("multiple root elements".into()));
                }
                stack.push(open(&start)?);
            }
            Event::Empty(start) => {
                let element = open(&start)?;
                close(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseError::Xml("unexpected closing tag".into()))?;
                close(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(c) => {
                let text = std::str::from_utf8(&c)?;
                push_text(&mut stack, text)?;
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Xml(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or(ParseError::Empty)
}

fn open(start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(top) => {
            top.push_text(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError::Xml("text outside the root element".into())),
    }
}

fn close(
    stack: &mut [Element],
    root: &mut Option<Element>,
    mut element: Element,
) -> Result<(), ParseError> {
    settle_layout(&mut element);
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None if root.is_some() => {
            return Err(ParseError::Xml("multiple root elements".into()));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn settle_layout(element: &mut Element) {
    if !element.has_element_children() {
        return;
    }
    element.children.retain_mut(|node| match node {
        Node::Element(_) => true,
        Node::Text(t) => {
            let trimmed = t.trim();
            if trimmed.len() != t.len() {
                *t = trimmed.to_string();
            }
            !t.is_empty()
        }
    });
}
