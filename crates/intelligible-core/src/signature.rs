//! Signature entries for the conclusions section.
//!
//! Every eId inside an entry is derived from the signatory's reference id:
//! `#alice` yields `conclusion_signature_alice_pers`,
//! `conclusion_signature_alice_signature`, and so on.

use crate::error::DocumentError;
use crate::tree::Element;
use crate::types::ReferenceId;

/// Prefix shared by all signature eIds.
pub const SIGNATURE_EID_PREFIX: &str = "conclusion_signature_";

fn derived_eid(signatory: &ReferenceId, suffix: &str) -> String {
    format!("{SIGNATURE_EID_PREFIX}{}_{suffix}", signatory.stem())
}

/// A signature by a person acting in a role.
///
/// Missing fields are kept as empty strings rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalSignature {
    pub signatory: ReferenceId,
    pub name: String,
    pub role_eid: String,
    pub role_name: String,
    pub public_key_href: String,
    pub public_key: String,
    pub timestamp: String,
    pub signature: String,
}

/// A signature by the issuing software.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareSignature {
    pub signatory: ReferenceId,
    pub name: String,
    pub signature: String,
}

/// Builder for [`PersonalSignature`].
#[derive(Debug, Clone)]
pub struct SignatureBuilder {
    eid: String,
    name: String,
    role_eid: String,
    role_name: String,
    public_key_href: String,
    public_key: String,
    timestamp: String,
    signature: String,
}

impl SignatureBuilder {
    /// Start a signature for the signatory `eid` (e.g. `#alice`).
    pub fn new(eid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            eid: eid.into(),
            name: name.into(),
            role_eid: String::new(),
            role_name: String::new(),
            public_key_href: String::new(),
            public_key: String::new(),
            timestamp: String::new(),
            signature: String::new(),
        }
    }

    /// Set the role the signatory acts in.
    pub fn role(mut self, eid: impl Into<String>, name: impl Into<String>) -> Self {
        self.role_eid = eid.into();
        self.role_name = name.into();
        self
    }

    /// Set the public key and where it is published.
    pub fn public_key(mut self, href: impl Into<String>, key: impl Into<String>) -> Self {
        self.public_key_href = href.into();
        self.public_key = key.into();
        self
    }

    pub fn timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = ts.into();
        self
    }

    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Build the signature. Fails if the signatory id is malformed.
    pub fn build(self) -> Result<PersonalSignature, DocumentError> {
        Ok(PersonalSignature {
            signatory: ReferenceId::parse(self.eid)?,
            name: self.name,
            role_eid: self.role_eid,
            role_name: self.role_name,
            public_key_href: self.public_key_href,
            public_key: self.public_key,
            timestamp: self.timestamp,
            signature: self.signature,
        })
    }
}

impl PersonalSignature {
    pub fn to_element(&self) -> Element {
        let id = &self.signatory;
        Element::new("signature")
            .with_child(
                Element::new("person")
                    .with_attr("eId", derived_eid(id, "pers"))
                    .with_attr("refersTo", id.as_str())
                    .with_text(self.name.as_str()),
            )
            .with_child(
                Element::new("role")
                    .with_attr("eId", derived_eid(id, "pers_role"))
                    .with_attr("refersTo", self.role_eid.as_str())
                    .with_text(self.role_name.as_str()),
            )
            .with_child(
                Element::new("publicKey")
                    .with_attr("eId", derived_eid(id, "pk"))
                    .with_child(
                        Element::new("ref")
                            .with_attr("eId", derived_eid(id, "pk_ref"))
                            .with_attr("href", self.public_key_href.as_str())
                            .with_text(self.public_key.as_str()),
                    ),
            )
            .with_child(
                Element::new("timestamp")
                    .with_attr("eId", derived_eid(id, "timestamp"))
                    .with_attr("date", self.timestamp.as_str())
                    .with_text(self.timestamp.as_str()),
            )
            .with_child(
                Element::new("digitalSignature")
                    .with_attr("eId", derived_eid(id, "signature"))
                    .with_text(self.signature.as_str()),
            )
    }

    fn from_element(signature: &Element) -> Option<Self> {
        let person = signature.child("person")?;
        let role = signature.child("role");
        let key_ref = signature.child("publicKey").and_then(|pk| pk.child("ref"));
        let text_of = |e: Option<&Element>| e.map(Element::text).unwrap_or_default();
        let attr_of = |e: Option<&Element>, name: &str| {
            e.and_then(|e| e.attr(name)).unwrap_or_default().to_string()
        };

        Some(Self {
            signatory: ReferenceId::parse(person.attr("refersTo")?).ok()?,
            name: person.text(),
            role_eid: attr_of(role, "refersTo"),
            role_name: text_of(role),
            public_key_href: attr_of(key_ref, "href"),
            public_key: text_of(key_ref),
            timestamp: text_of(signature.child("timestamp")),
            signature: text_of(signature.child("digitalSignature")),
        })
    }
}

impl SoftwareSignature {
    pub fn new(
        eid: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        Ok(Self {
            signatory: ReferenceId::parse(eid)?,
            name: name.into(),
            signature: signature.into(),
        })
    }

    pub fn to_element(&self) -> Element {
        let id = &self.signatory;
        Element::new("signature")
            .with_child(
                Element::new("object")
                    .with_attr("eId", derived_eid(id, "sw"))
                    .with_attr("refersTo", id.as_str())
                    .with_text(self.name.as_str()),
            )
            .with_child(
                Element::new("digitalSignature")
                    .with_attr("eId", derived_eid(id, "sw_signature"))
                    .with_text(self.signature.as_str()),
            )
    }

    fn from_element(signature: &Element) -> Option<Self> {
        let object = signature.child("object")?;
        Some(Self {
            signatory: ReferenceId::parse(object.attr("refersTo")?).ok()?,
            name: object.text(),
            signature: signature
                .child("digitalSignature")
                .map(Element::text)
                .unwrap_or_default(),
        })
    }
}

/// One entry of the conclusions section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureEntry {
    Personal(PersonalSignature),
    Software(SoftwareSignature),
}

impl SignatureEntry {
    pub fn signatory(&self) -> &ReferenceId {
        match self {
            Self::Personal(s) => &s.signatory,
            Self::Software(s) => &s.signatory,
        }
    }

    pub fn signature(&self) -> &str {
        match self {
            Self::Personal(s) => &s.signature,
            Self::Software(s) => &s.signature,
        }
    }

    pub fn to_element(&self) -> Element {
        match self {
            Self::Personal(s) => s.to_element(),
            Self::Software(s) => s.to_element(),
        }
    }

    /// Decode a `<signature>` element. Returns `None` for unknown shapes.
    pub fn from_element(element: &Element) -> Option<Self> {
        if element.name != "signature" {
            return None;
        }
        PersonalSignature::from_element(element)
            .map(Self::Personal)
            .or_else(|| SoftwareSignature::from_element(element).map(Self::Software))
    }
}

impl From<PersonalSignature> for SignatureEntry {
    fn from(s: PersonalSignature) -> Self {
        Self::Personal(s)
    }
}

impl From<SoftwareSignature> for SignatureEntry {
    fn from(s: SoftwareSignature) -> Self {
        Self::Software(s)
    }
}
