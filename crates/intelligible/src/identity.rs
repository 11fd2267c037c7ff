//! Identity documents: who issued an identity to whom.
//!
//! Body layout, in order: `information` (tblock 1), `web3` (tblock 2),
//! `identities` (tblock 3), then any additional blocks.

use intelligible_core::{
    BodyBlock, Document, DocumentElements, DocumentError, Identification, OrderedMap, TokenRef,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::compose::{frbr_identification, other_key, party_block, with_references};
use crate::error::{IntelligibleError, Result};
use crate::party::Party;
use crate::reader;

/// Descriptive fields of an identity document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityInformation {
    /// Also used as the element name holding `name` and `email`, so it must
    /// be a valid XML name (`person`, `organization`, ...).
    pub identity_type: String,
    pub identity_expression: String,
    pub identity_date: String,
    pub name: String,
    pub email: String,
    /// FRBR entries that replace the generated ones.
    #[serde(flatten)]
    pub identification: Identification,
    #[serde(default)]
    pub additional_body: OrderedMap<BodyBlock>,
}

impl IdentityInformation {
    pub fn new(
        identity_type: impl Into<String>,
        identity_expression: impl Into<String>,
        identity_date: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            identity_type: identity_type.into(),
            identity_expression: identity_expression.into(),
            identity_date: identity_date.into(),
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Append a body block after the fixed ones.
    pub fn with_block(mut self, name: impl Into<String>, block: BodyBlock) -> Self {
        self.additional_body.insert(name, block);
        self
    }
}

/// The parties of an identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityReferences {
    #[serde(rename = "idIssuer")]
    pub issuer: Party,
    #[serde(rename = "idIssuerRole")]
    pub issuer_role: Party,
    #[serde(rename = "idIssuerRepresentative")]
    pub issuer_representative: Party,
    #[serde(rename = "idIssuerRepresentativeRole")]
    pub issuer_representative_role: Party,
    #[serde(rename = "idReceiver")]
    pub receiver: Party,
    #[serde(rename = "idReceiverRole")]
    pub receiver_role: Party,
    /// Further references, e.g. the issuing software.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub others: Vec<Party>,
}

impl IdentityReferences {
    pub fn with_other(mut self, party: Party) -> Self {
        self.others.push(party);
        self
    }

    fn slots(&self) -> [(&'static str, &Party); 6] {
        [
            ("idIssuer", &self.issuer),
            ("idIssuerRole", &self.issuer_role),
            ("idIssuerRepresentative", &self.issuer_representative),
            ("idIssuerRepresentativeRole", &self.issuer_representative_role),
            ("idReceiver", &self.receiver),
            ("idReceiverRole", &self.receiver_role),
        ]
    }
}

/// An identity document read back into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentity {
    pub information: IdentityInformation,
    pub references: IdentityReferences,
    pub token: TokenRef,
}

/// Akoma Ntoso URI under which a person's identity is published.
pub fn identity_akn_uri(name: &str) -> String {
    format!("/akn/eu/intelligibleIdentity/person/{name}/decentralizedIdentity/nonFungible.akn")
}

/// Information paragraph keys written before the identity holder.
const RESERVED_INFORMATION_KEYS: [&str; 3] = ["identityType", "identityExpression", "docDate"];

/// Compose the assembler input for an identity document.
pub fn identity_elements(
    information: &IdentityInformation,
    references: &IdentityReferences,
    token: &TokenRef,
) -> std::result::Result<DocumentElements, DocumentError> {
    let info = information;
    if info.identity_type.is_empty() {
        return Err(DocumentError::MissingRequiredField {
            field: "identityType".into(),
            context: "identity information".into(),
        });
    }
    if RESERVED_INFORMATION_KEYS.contains(&info.identity_type.as_str()) {
        return Err(DocumentError::InvalidFragment {
            path: "identityType".into(),
            reason: format!("{:?} names a fixed information field", info.identity_type),
        });
    }

    let work = format!(
        "/akn/eu/doc/intelligibleIdentity/{}/{}",
        info.identity_type, references.receiver.name
    );
    let expression = format!(
        "{work}/{}/{}",
        references.issuer.name, info.identity_expression
    );
    let identification = frbr_identification(
        &work,
        &expression,
        &info.identity_date,
        &references.issuer_representative.eid,
        &info.identification,
    );

    let preface = format!(
        "Identity of type {} issued by {} to {}",
        info.identity_type, references.issuer.name, references.receiver.name
    );

    let mut elements = with_references(
        DocumentElements {
            identification,
            ..DocumentElements::new(preface)
        },
        references.slots(),
    );
    for party in &references.others {
        elements = elements.reference(other_key(party), party.to_reference());
    }

    elements = elements
        .block("information", information_block(info, &references.receiver))
        .block("web3", web3_block(token))
        .block("identities", identities_block(references));
    for (name, block) in info.additional_body.iter() {
        elements = elements.block(name, block.clone());
    }
    Ok(elements)
}

fn information_block(info: &IdentityInformation, receiver: &Party) -> BodyBlock {
    BodyBlock::new("Identity Information")
        .field("identityType", info.identity_type.as_str())
        .field("identityExpression", info.identity_expression.as_str())
        .field(
            "docDate",
            json!({
                "@eId": "id_info_id_date",
                "@date": info.identity_date,
                "#": info.identity_date,
            }),
        )
        .field(
            info.identity_type.as_str(),
            json!({
                "@eId": "id_info_id_info",
                "@refersTo": receiver.eid.as_str(),
                "#": { "name": info.name, "email": info.email },
            }),
        )
}

fn web3_block(token: &TokenRef) -> BodyBlock {
    BodyBlock {
        p: token.to_object(),
        ..BodyBlock::new("Ethereum Address")
    }
}

fn identities_block(references: &IdentityReferences) -> BodyBlock {
    let r = references;
    let blocks = vec![
        party_block("identities_block_id_issuer", "identities_id_issuer", &r.issuer, &r.issuer_role),
        party_block(
            "identities_block_id_issuer_repr",
            "identities_id_issuer_repr",
            &r.issuer_representative,
            &r.issuer_representative_role,
        ),
        party_block("identities_block_id_receiver", "identities_id_receiver", &r.receiver, &r.receiver_role),
    ];
    BodyBlock::new("Identities").field("block", Value::Array(blocks))
}

/// Read an identity document back into its parts.
pub fn parse_identity(doc: &Document) -> Result<ParsedIdentity> {
    let info = reader::paragraph(doc, 1)?;
    let identity_type = reader::child_text(info, "identityType")?;
    let holder = info.child(&identity_type).ok_or_else(|| {
        IntelligibleError::MalformedDocument(format!("no {identity_type} holder"))
    })?;

    let token = TokenRef::from_object(&reader::paragraph(doc, 2)?.to_object());

    let mut blocks = reader::party_blocks(doc, 3)?;
    let issuer = reader::take_block(&mut blocks, "id_issuer")?;
    let representative = reader::take_block(&mut blocks, "id_issuer_repr")?;
    let receiver = reader::take_block(&mut blocks, "id_receiver")?;

    let known = [
        &issuer.party,
        &issuer.role,
        &representative.party,
        &representative.role,
        &receiver.party,
        &receiver.role,
    ];
    let others = reader::other_parties(doc, &known);

    let information = IdentityInformation {
        identity_expression: reader::child_text(info, "identityExpression")?,
        identity_date: reader::child_text(info, "docDate")?,
        name: reader::child_text(holder, "name")?,
        email: reader::child_text(holder, "email")?,
        identification: reader::identification(doc)?,
        additional_body: reader::additional_blocks(doc, 4),
        identity_type,
    };
    let references = IdentityReferences {
        issuer: issuer.party,
        issuer_role: issuer.role,
        issuer_representative: representative.party,
        issuer_representative_role: representative.role,
        receiver: receiver.party,
        receiver_role: receiver.role,
        others,
    };
    tracing::debug!(receiver = %references.receiver.name, "read identity document");

    Ok(ParsedIdentity {
        information,
        references,
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use intelligible_core::{assemble, ReferenceType, Template};

    fn party(kind: ReferenceType, eid: &str, name: &str, href: &str, show_as: &str) -> Party {
        Party::new(kind, eid, name, href).unwrap().with_show_as(show_as)
    }

    fn references() -> IdentityReferences {
        IdentityReferences {
            issuer: party(ReferenceType::Person, "#idIssuer", "PersonX", "/person/PersonX/", "Issuer"),
            issuer_role: party(ReferenceType::Role, "#issuerRole", "Issuer", "/roles/issuer", "IssuerRole"),
            issuer_representative: party(
                ReferenceType::Person,
                "#idIssuerRepresentative",
                "PersonX",
                "/person/PersonX/",
                "Author",
            ),
            issuer_representative_role: party(
                ReferenceType::Role,
                "#issuerRepresentativeRole",
                "IssuerRepresentative",
                "/roles/issuerRepresentative",
                "IssuerRepresentativeRole",
            ),
            receiver: party(ReferenceType::Person, "#idReceiver", "PersonY", "/person/PersonY/", "Receiver"),
            receiver_role: party(ReferenceType::Role, "#receiverRole", "Receiver", "/roles/receiver", "ReceiverRole"),
            others: Vec::new(),
        }
        .with_other(party(
            ReferenceType::Object,
            "#issuerSoftware",
            "IntelligibleSuite@0.1.0",
            "/akn/eu/doc/object/software/IntelligibleSuite/ver@0.1.0.akn",
            "IssuerSoftware",
        ))
    }

    fn information() -> IdentityInformation {
        IdentityInformation::new("person", "DID@2024-05-01", "2024-05-01", "Person Y", "person@y.com")
    }

    fn document() -> Document {
        let elements = identity_elements(&information(), &references(), &TokenRef::Unissued).unwrap();
        assemble(&Template::identity(), &elements).unwrap()
    }

    #[test]
    fn test_uris_and_preface() {
        let doc = document();

        assert_eq!(
            doc.find_by_eid("frbrwork__frbrthis").and_then(|e| e.attr("value")),
            Some("/akn/eu/doc/intelligibleIdentity/person/PersonY/!main")
        );
        assert_eq!(
            doc.find_by_eid("frbrmanifestation__frbruri").and_then(|e| e.attr("value")),
            Some("/akn/eu/doc/intelligibleIdentity/person/PersonY/PersonX/DID@2024-05-01.akn")
        );
        assert_eq!(
            doc.find_by_eid("frbrwork__frbrauthor_1").and_then(|e| e.attr("href")),
            Some("#idIssuerRepresentative")
        );
        let title = doc.find_by_eid("preface__longTitle_1").and_then(|t| t.child("p")).map(|p| p.text());
        assert_eq!(
            title.as_deref(),
            Some("Identity of type person issued by PersonX to PersonY")
        );
    }

    #[test]
    fn test_body_eids() {
        let doc = document();

        assert_eq!(doc.value_by_eid("tblock_1__heading").as_deref(), Some("Identity Information"));
        assert_eq!(doc.value_by_eid("id_info_id_date").as_deref(), Some("2024-05-01"));
        assert_eq!(
            doc.find_by_eid("id_info_id_info").and_then(|e| e.attr("refersTo")),
            Some("#idReceiver")
        );
        assert_eq!(doc.value_by_eid("tblock_2__heading").as_deref(), Some("Ethereum Address"));
        assert_eq!(doc.value_by_eid("identities_id_issuer").as_deref(), Some("PersonX"));
        assert_eq!(doc.value_by_eid("identities_id_receiver").as_deref(), Some("PersonY"));
        assert_eq!(doc.value_by_eid("identities_id_receiver_role").as_deref(), Some("Receiver"));
        assert!(intelligible_core::duplicate_eids(doc.root()).is_empty());
    }

    #[test]
    fn test_parse_round_trip() {
        let doc = document();
        let parsed = parse_identity(&doc).unwrap();

        assert_eq!(parsed.information.identity_type, "person");
        assert_eq!(parsed.information.identity_expression, "DID@2024-05-01");
        assert_eq!(parsed.information.identity_date, "2024-05-01");
        assert_eq!(parsed.information.name, "Person Y");
        assert_eq!(parsed.information.email, "person@y.com");
        assert_eq!(parsed.token, TokenRef::Unissued);

        let expected = references();
        assert_eq!(parsed.references.issuer, expected.issuer);
        assert_eq!(parsed.references.issuer_representative_role, expected.issuer_representative_role);
        assert_eq!(parsed.references.receiver, expected.receiver);
        assert_eq!(parsed.references.others.len(), 1);
        assert_eq!(parsed.references.others[0].eid, expected.others[0].eid);

        let rebuilt = identity_elements(&parsed.information, &parsed.references, &parsed.token).unwrap();
        let rebuilt = assemble(&Template::identity(), &rebuilt).unwrap();
        assert_eq!(rebuilt.finalize_no_conclusions(), doc.finalize_no_conclusions());
    }

    #[test]
    fn test_additional_blocks_follow_fixed_ones() {
        let info = information().with_block(
            "notes",
            BodyBlock::new("Notes").field("note", "verified in person"),
        );
        let elements = identity_elements(&info, &references(), &TokenRef::issued("0xa", "0xc", "3")).unwrap();
        let doc = assemble(&Template::identity(), &elements).unwrap();

        assert_eq!(doc.value_by_eid("tblock_4__heading").as_deref(), Some("Notes"));
        let parsed = parse_identity(&doc).unwrap();
        assert_eq!(parsed.token, TokenRef::issued("0xa", "0xc", "3"));
        let extra = parsed.information.additional_body.get("tblock_4").unwrap();
        assert_eq!(extra.block_title, "Notes");
        assert_eq!(extra.p.get("note"), Some(&json!("verified in person")));
    }

    #[test]
    fn test_missing_identity_type() {
        let mut info = information();
        info.identity_type.clear();
        assert!(matches!(
            identity_elements(&info, &references(), &TokenRef::Unissued),
            Err(DocumentError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_identity_type_cannot_shadow_fixed_fields() {
        for reserved in ["identityType", "identityExpression", "docDate"] {
            let mut info = information();
            info.identity_type = reserved.to_string();
            assert!(matches!(
                identity_elements(&info, &references(), &TokenRef::Unissued),
                Err(DocumentError::InvalidFragment { .. })
            ));
        }
    }

    #[test]
    fn test_parse_mod_layout_with_repeated_receiver_ids() {
        let text = document()
            .finalize()
            .replace("identities_block_id_receiver", "identities_mod_id_issuer_repr")
            .replace("identities_id_receiver", "identities_id_issuer_repr")
            .replace("identities_block_", "identities_mod_")
            .replace("<block ", "<mod ")
            .replace("</block>", "</mod>");
        assert!(!text.contains("<block "));

        let doc = Document::parse(&text, Template::identity().kind()).unwrap();
        let parsed = parse_identity(&doc).unwrap();

        let expected = references();
        assert_eq!(parsed.references.issuer, expected.issuer);
        assert_eq!(parsed.references.issuer_representative, expected.issuer_representative);
        assert_eq!(parsed.references.issuer_representative_role, expected.issuer_representative_role);
        assert_eq!(parsed.references.receiver, expected.receiver);
        assert_eq!(parsed.references.receiver_role, expected.receiver_role);
        assert_eq!(parsed.information.name, "Person Y");
    }

    #[test]
    fn test_parse_rejects_foreign_document() {
        let elements = DocumentElements::new("Plain").block("info", BodyBlock::new("Info"));
        let doc = assemble(&Template::identity(), &elements).unwrap();
        assert!(parse_identity(&doc).is_err());
    }

    #[test]
    fn test_json_notation() {
        let info: IdentityInformation = serde_json::from_value(json!({
            "identityType": "person",
            "identityDate": "2024-05-01",
            "identityExpression": "DID@2024-05-01",
            "name": "Person Y",
            "email": "person@y.com",
            "FRBRWork": {},
            "FRBRExpression": {},
            "FRBRManifestation": {},
            "additionalBody": {},
        }))
        .unwrap();
        assert_eq!(info, information());

        let value = serde_json::to_value(references()).unwrap();
        assert_eq!(value["idIssuer"]["type"], json!("TLCPerson"));
        assert_eq!(value["idIssuer"]["@eId"], json!("#idIssuer"));
        assert_eq!(value["idReceiverRole"]["@showAs"], json!("ReceiverRole"));
        let back: IdentityReferences = serde_json::from_value(value).unwrap();
        assert_eq!(back, references());
    }

    #[test]
    fn test_akn_uri() {
        assert_eq!(
            identity_akn_uri("PersonX"),
            "/akn/eu/intelligibleIdentity/person/PersonX/decentralizedIdentity/nonFungible.akn"
        );
    }
}
