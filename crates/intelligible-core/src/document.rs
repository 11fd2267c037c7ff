//! The in-memory document and its serialized forms.

use serde_json::{Map, Value};

use crate::canonical::canonical_xml;
use crate::config::{DocumentKind, DuplicateSignaturePolicy};
use crate::error::{DocumentError, ParseError};
use crate::locate::find_by_eid;
use crate::parse::parse_element;
use crate::signature::{PersonalSignature, SignatureEntry, SoftwareSignature};
use crate::template::Template;
use crate::tree::Element;
use crate::validation::validate_document_structure;

/// A document tree with its conclusions held apart.
///
/// The main tree never contains a conclusions section. Signatures live in
/// `conclusions` and are merged back only when finalizing, so the signed
/// payload ([`Document::finalize_no_conclusions`]) cannot change as
/// signatures are added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    kind: DocumentKind,
    root: Element,
    conclusions: Option<Element>,
    duplicate_signatures: DuplicateSignaturePolicy,
}

impl Document {
    pub(crate) fn new(
        kind: DocumentKind,
        root: Element,
        duplicate_signatures: DuplicateSignaturePolicy,
    ) -> Self {
        Self {
            kind,
            root,
            conclusions: None,
            duplicate_signatures,
        }
    }

    /// Parse a finalized text, splitting off any conclusions.
    pub fn try_parse(text: &str, kind: DocumentKind) -> Result<Self, ParseError> {
        let mut root = parse_element(text)?;
        validate_document_structure(&root, kind)?;
        let conclusions = root
            .child_mut("doc")
            .and_then(|doc| doc.remove_child("conclusions"));
        Ok(Self {
            kind,
            root,
            conclusions,
            duplicate_signatures: DuplicateSignaturePolicy::default(),
        })
    }

    /// Like [`Document::try_parse`], but any failure is simply "no document".
    pub fn parse(text: &str, kind: DocumentKind) -> Option<Self> {
        match Self::try_parse(text, kind) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!(error = %e, "text is not a {} document", kind.root_tag());
                None
            }
        }
    }

    pub fn with_duplicate_signatures(mut self, policy: DuplicateSignaturePolicy) -> Self {
        self.duplicate_signatures = policy;
        self
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The tree without conclusions.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The `doc` section.
    pub fn doc(&self) -> Option<&Element> {
        self.root.child("doc")
    }

    pub fn conclusions(&self) -> Option<&Element> {
        self.conclusions.as_ref()
    }

    /// Append a personal signature to the conclusions.
    pub fn add_signature(&mut self, signature: PersonalSignature) -> Result<(), DocumentError> {
        self.append(signature.into())
    }

    /// Append a software signature to the conclusions.
    ///
    /// Fails with [`DocumentError::MalformedReferenceId`] unless `eid` is
    /// `#` followed by a name.
    pub fn add_sw_signature(
        &mut self,
        eid: &str,
        name: &str,
        signature: &str,
    ) -> Result<(), DocumentError> {
        self.append(SoftwareSignature::new(eid, name, signature)?.into())
    }

    fn append(&mut self, entry: SignatureEntry) -> Result<(), DocumentError> {
        if self.duplicate_signatures == DuplicateSignaturePolicy::Reject
            && self
                .signatures()
                .iter()
                .any(|s| s.signatory() == entry.signatory())
        {
            return Err(DocumentError::DuplicateSignature(
                entry.signatory().to_string(),
            ));
        }
        self.conclusions
            .get_or_insert_with(Template::conclusions_skeleton)
            .push_child(entry.to_element());
        Ok(())
    }

    /// Signatures in the order they were appended.
    ///
    /// Entries of unknown shape (from parsed text) are skipped.
    pub fn signatures(&self) -> Vec<SignatureEntry> {
        self.conclusions
            .iter()
            .flat_map(|c| c.children_named("signature"))
            .filter_map(SignatureEntry::from_element)
            .collect()
    }

    /// The full text, conclusions included.
    pub fn finalize(&self) -> String {
        match &self.conclusions {
            Some(conclusions) => {
                let mut root = self.root.clone();
                match root.child_mut("doc") {
                    Some(doc) => doc.push_child(conclusions.clone()),
                    None => root.push_child(conclusions.clone()),
                }
                canonical_xml(&root)
            }
            None => canonical_xml(&self.root),
        }
    }

    /// The text without conclusions: the payload that gets signed.
    pub fn finalize_no_conclusions(&self) -> String {
        canonical_xml(&self.root)
    }

    /// First element in document order with the given eId, conclusions
    /// included.
    pub fn find_by_eid(&self, eid: &str) -> Option<&Element> {
        find_by_eid(&self.root, eid)
            .or_else(|| self.conclusions.as_ref().and_then(|c| find_by_eid(c, eid)))
    }

    /// Text content of the element with the given eId.
    pub fn value_by_eid(&self, eid: &str) -> Option<String> {
        self.find_by_eid(eid).map(Element::text)
    }

    /// The element with the given eId in object notation, keyed by its tag:
    /// `{"p": {"@eId": "tblock_1__p_1", ...}}`.
    pub fn object_by_eid(&self, eid: &str) -> Option<Value> {
        self.find_by_eid(eid).map(|e| {
            let mut wrapped = Map::new();
            wrapped.insert(e.name.clone(), e.to_object());
            Value::Object(wrapped)
        })
    }
}
