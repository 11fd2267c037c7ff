//! Participants named in identity and certificate documents.

use intelligible_core::{DocumentError, Element, Reference, ReferenceId, ReferenceType};
use serde::{Deserialize, Serialize};

/// A person, organization, role or object a document refers to.
///
/// Each party becomes one `TLC*` entry under `meta/references` and is
/// mentioned in the body through `refersTo`.
///
/// Serializes in reference notation:
/// `{"type": "TLCPerson", "name", "@eId", "@href", "@showAs"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    #[serde(rename = "type")]
    pub kind: ReferenceType,
    #[serde(rename = "@eId")]
    pub eid: ReferenceId,
    /// Display name written into body mentions.
    pub name: String,
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(rename = "@showAs")]
    pub show_as: String,
}

impl Party {
    /// A party whose `showAs` label is its name.
    ///
    /// Fails unless `eid` is `#` followed by a name.
    pub fn new(
        kind: ReferenceType,
        eid: &str,
        name: impl Into<String>,
        href: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let name = name.into();
        Ok(Self {
            kind,
            eid: ReferenceId::parse(eid)?,
            show_as: name.clone(),
            name,
            href: href.into(),
        })
    }

    pub fn with_show_as(mut self, show_as: impl Into<String>) -> Self {
        self.show_as = show_as.into();
        self
    }

    /// The reference entry for this party.
    pub fn to_reference(&self) -> Reference {
        Reference::new(self.href.as_str())
            .with_kind(self.kind)
            .with_eid(self.eid.as_str())
            .with_show_as(self.show_as.as_str())
            .with_name(self.name.as_str())
    }

    /// Rebuild a party from its reference element and the name used where
    /// it is mentioned.
    pub(crate) fn from_reference_element(element: &Element, name: String) -> Option<Self> {
        Some(Self {
            kind: ReferenceType::from_tag(&element.name)?,
            eid: ReferenceId::parse(element.eid()?).ok()?,
            name,
            href: element.attr("href").unwrap_or_default().to_string(),
            show_as: element.attr("showAs").unwrap_or_default().to_string(),
        })
    }
}
