//! Strong type definitions for document references.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DocumentError;

/// Category of a reference, mapped to its element tags.
///
/// Tags are a fixed table rather than string surgery on the type name, so an
/// unknown type is rejected when the reference is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReferenceType {
    Person,
    Organization,
    Role,
    Object,
    Concept,
    Location,
    Event,
    Term,
    Process,
    #[default]
    Reference,
}

impl ReferenceType {
    pub const ALL: [ReferenceType; 10] = [
        Self::Person,
        Self::Organization,
        Self::Role,
        Self::Object,
        Self::Concept,
        Self::Location,
        Self::Event,
        Self::Term,
        Self::Process,
        Self::Reference,
    ];

    /// Tag used for the entry under `meta/references`.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Person => "TLCPerson",
            Self::Organization => "TLCOrganization",
            Self::Role => "TLCRole",
            Self::Object => "TLCObject",
            Self::Concept => "TLCConcept",
            Self::Location => "TLCLocation",
            Self::Event => "TLCEvent",
            Self::Term => "TLCTerm",
            Self::Process => "TLCProcess",
            Self::Reference => "TLCReference",
        }
    }

    /// Inline tag used when the reference is mentioned in body text.
    pub const fn body_tag(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Role => "role",
            Self::Object => "object",
            Self::Concept => "concept",
            Self::Location => "location",
            Self::Event => "event",
            Self::Term => "term",
            Self::Process => "process",
            Self::Reference => "reference",
        }
    }

    /// Reverse lookup from a `meta/references` tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ReferenceType {
    type Err = DocumentError;

    /// Accepts either the references tag (`TLCPerson`) or the body tag (`person`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == s || t.body_tag() == s)
            .ok_or_else(|| DocumentError::UnknownReferenceType(s.to_string()))
    }
}

impl TryFrom<String> for ReferenceType {
    type Error = DocumentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ReferenceType> for String {
    fn from(t: ReferenceType) -> Self {
        t.tag().to_string()
    }
}

/// A reference identifier: `#` followed by a non-empty name.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceId(String);

impl ReferenceId {
    /// Validate and wrap a reference id such as `#alice`.
    pub fn parse(s: impl Into<String>) -> Result<Self, DocumentError> {
        let s = s.into();
        match s.strip_prefix('#') {
            Some(stem) if !stem.is_empty() => Ok(Self(s)),
            _ => Err(DocumentError::MalformedReferenceId(s)),
        }
    }

    /// Reference id for a bare name.
    pub fn for_name(name: &str) -> Result<Self, DocumentError> {
        Self::parse(format!("#{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its leading `#`.
    pub fn stem(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Debug for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceId({})", self.0)
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReferenceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ReferenceId {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReferenceId {
    type Error = DocumentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ReferenceId> for String {
    fn from(id: ReferenceId) -> Self {
        id.0
    }
}
