//! Identifier lookup over element trees.

use crate::tree::Element;

/// Pre-order (document order) iterator over an element and its descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let mark = self.stack.len();
        self.stack.extend(next.elements());
        self.stack[mark..].reverse();
        Some(next)
    }
}

/// Walk `root` and all its descendant elements in document order.
pub fn descendants(root: &Element) -> Descendants<'_> {
    Descendants { stack: vec![root] }
}

/// First element in document order whose `eId` equals `eid`.
///
/// Identifiers are unique by construction; this does not check it.
pub fn find_by_eid<'a>(root: &'a Element, eid: &str) -> Option<&'a Element> {
    descendants(root).find(|e| e.eid() == Some(eid))
}

/// Every `eId` in the tree, in document order.
pub fn eids(root: &Element) -> Vec<&str> {
    descendants(root).filter_map(Element::eid).collect()
}
