//! Input validation and structural checks on document trees.

use std::collections::HashSet;

use crate::config::DocumentKind;
use crate::elements::DocumentElements;
use crate::error::{DocumentError, ParseError};
use crate::locate::descendants;
use crate::tree::Element;

/// Validate caller input before assembly.
///
/// This performs:
/// - `href` presence on every reference
/// - non-empty reference names and block names
pub fn validate_elements(elements: &DocumentElements) -> Result<(), DocumentError> {
    for (name, reference) in elements.references.iter() {
        if name.is_empty() {
            return Err(DocumentError::fragment("references", "empty reference name"));
        }
        reference.resolve(name)?;
    }
    for (name, _) in elements.main_body.iter() {
        if name.is_empty() {
            return Err(DocumentError::fragment("mainBody", "empty block name"));
        }
    }
    Ok(())
}

/// Check that a parsed tree is a document of the given kind.
pub fn validate_document_structure(root: &Element, kind: DocumentKind) -> Result<(), ParseError> {
    if root.name != kind.root_tag() {
        return Err(ParseError::MissingRoot {
            expected: kind.root_tag().to_string(),
            found: root.name.clone(),
        });
    }
    if root.child("doc").is_none() {
        return Err(ParseError::MissingSection("doc"));
    }
    Ok(())
}

/// eIds that occur more than once, in order of their second occurrence.
pub fn duplicate_eids(root: &Element) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for eid in descendants(root).filter_map(Element::eid) {
        if !seen.insert(eid) && !duplicates.iter().any(|d: &String| d == eid) {
            duplicates.push(eid.to_string());
        }
    }
    duplicates
}
