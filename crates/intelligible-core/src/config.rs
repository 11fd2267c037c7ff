//! Document configuration.

/// Which family of document to build. Selects the root tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentKind {
    /// Akoma Ntoso: `<akomaNtoso>` with namespace attributes.
    #[default]
    Akn,
    /// Intelligible metadata: `<metaDoc>`, no namespaces.
    Metadata,
}

impl DocumentKind {
    pub const fn root_tag(self) -> &'static str {
        match self {
            Self::Akn => "akomaNtoso",
            Self::Metadata => "metaDoc",
        }
    }

    /// Root attributes, in output order.
    pub const fn root_attributes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Akn => &[
                ("xmlns", "http://docs.oasis-open.org/legaldocml/ns/akn/3.0/CSD06"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
                (
                    "xsi:schemaLocation",
                    "http://akomantoso.googlecode.com/svn/release/trunk/schema/akomantoso30.xsd",
                ),
            ],
            Self::Metadata => &[],
        }
    }
}

/// What to do when a signatory signs the same document twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateSignaturePolicy {
    /// Keep every signature in call order, as an amendment history.
    #[default]
    Append,
    /// Fail with [`crate::DocumentError::DuplicateSignature`].
    Reject,
}

/// Configuration for building documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    pub kind: DocumentKind,
    /// Value of `doc/@name`.
    pub doc_name: String,
    /// Value of the `@source` attribute on identification and references.
    pub source: String,
    pub duplicate_signatures: DuplicateSignaturePolicy,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            kind: DocumentKind::Akn,
            doc_name: "document".to_string(),
            source: "#issuerSoftware".to_string(),
            duplicate_signatures: DuplicateSignaturePolicy::Append,
        }
    }
}

impl DocumentConfig {
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_doc_name(mut self, name: impl Into<String>) -> Self {
        self.doc_name = name.into();
        self
    }

    pub fn with_duplicate_signatures(mut self, policy: DuplicateSignaturePolicy) -> Self {
        self.duplicate_signatures = policy;
        self
    }
}
