//! Proptest generators for property-based testing.

use proptest::prelude::*;

use intelligible_core::{BodyBlock, DocumentElements, DocumentKind, Reference, ReferenceType};

/// A valid element or reference name.
pub fn name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,11}".prop_map(String::from)
}

/// Printable text without surrounding whitespace, XML specials included.
pub fn text() -> impl Strategy<Value = String> {
    "[!-~]([ -~]{0,22}[!-~])?".prop_map(String::from)
}

pub fn reference_type() -> impl Strategy<Value = ReferenceType> {
    prop::sample::select(ReferenceType::ALL.to_vec())
}

pub fn document_kind() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![Just(DocumentKind::Akn), Just(DocumentKind::Metadata)]
}

/// A reference with a href and, sometimes, a type and a label.
pub fn reference() -> impl Strategy<Value = Reference> {
    (text(), proptest::option::of(reference_type()), proptest::option::of(text())).prop_map(
        |(href, kind, show_as)| {
            let mut reference = Reference::new(href);
            reference.kind = kind;
            reference.show_as = show_as;
            reference
        },
    )
}

pub fn body_block() -> impl Strategy<Value = BodyBlock> {
    (text(), prop::collection::vec((name(), text()), 0..4)).prop_map(|(title, fields)| {
        fields
            .into_iter()
            .fold(BodyBlock::new(title), |block, (k, v)| block.field(k, v))
    })
}

/// Caller input with up to four references and four body blocks.
pub fn document_elements() -> impl Strategy<Value = DocumentElements> {
    (
        text(),
        prop::collection::vec((name(), reference()), 0..4),
        prop::collection::vec((name(), body_block()), 0..4),
    )
        .prop_map(|(title, references, blocks)| DocumentElements {
            references: references.into_iter().collect(),
            main_body: blocks.into_iter().collect(),
            ..DocumentElements::new(title)
        })
}
