//! Certificate documents: an issuer certifies an entity for a receiver.
//!
//! Body layout, in order: `information` (tblock 1), `web3` (tblock 2),
//! `identities` (tblock 3), then any additional blocks.

use intelligible_core::{
    BodyBlock, Document, DocumentElements, DocumentError, Identification, OrderedMap, TokenRef,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::compose::{frbr_identification, mention, other_key, party_block, with_references};
use crate::error::{IntelligibleError, Result};
use crate::party::Party;
use crate::reader;

/// Descriptive fields of a certificate document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInformation {
    pub certificate_type: String,
    pub certified_entity_type: String,
    pub certificate_expression: String,
    pub certificate_date: String,
    /// FRBR entries that replace the generated ones.
    #[serde(flatten)]
    pub identification: Identification,
    #[serde(default)]
    pub additional_body: OrderedMap<BodyBlock>,
}

impl CertificateInformation {
    pub fn new(
        certificate_type: impl Into<String>,
        certified_entity_type: impl Into<String>,
        certificate_expression: impl Into<String>,
        certificate_date: impl Into<String>,
    ) -> Self {
        Self {
            certificate_type: certificate_type.into(),
            certified_entity_type: certified_entity_type.into(),
            certificate_expression: certificate_expression.into(),
            certificate_date: certificate_date.into(),
            ..Self::default()
        }
    }

    pub fn with_block(mut self, name: impl Into<String>, block: BodyBlock) -> Self {
        self.additional_body.insert(name, block);
        self
    }
}

/// The thing being certified, with the digest of the certified content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertifiedEntity {
    #[serde(flatten)]
    pub party: Party,
    #[serde(rename = "documentHashDigest")]
    pub document_hash_digest: String,
}

/// The parties of a certificate document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateReferences {
    #[serde(rename = "certIssuer")]
    pub issuer: Party,
    #[serde(rename = "certIssuerRole")]
    pub issuer_role: Party,
    #[serde(rename = "certIssuerRepresentative")]
    pub issuer_representative: Party,
    #[serde(rename = "certIssuerRepresentativeRole")]
    pub issuer_representative_role: Party,
    #[serde(rename = "certReceiver")]
    pub receiver: Party,
    #[serde(rename = "certReceiverRole")]
    pub receiver_role: Party,
    #[serde(rename = "certEntity")]
    pub entity: CertifiedEntity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub others: Vec<Party>,
}

impl CertificateReferences {
    pub fn with_other(mut self, party: Party) -> Self {
        self.others.push(party);
        self
    }

    fn slots(&self) -> [(&'static str, &Party); 7] {
        [
            ("certIssuer", &self.issuer),
            ("certIssuerRole", &self.issuer_role),
            ("certIssuerRepresentative", &self.issuer_representative),
            ("certIssuerRepresentativeRole", &self.issuer_representative_role),
            ("certReceiver", &self.receiver),
            ("certReceiverRole", &self.receiver_role),
            ("certEntity", &self.entity.party),
        ]
    }
}

/// A certificate document read back into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCertificate {
    pub information: CertificateInformation,
    pub references: CertificateReferences,
    pub token: TokenRef,
}

/// Akoma Ntoso URI under which a certified document is published.
pub fn certificate_akn_uri(name: &str) -> String {
    format!("/akn/eu/intelligibleCertificate/document/{name}/decentralizedCertificate/nonFungible.akn")
}

/// Compose the assembler input for a certificate document.
pub fn certificate_elements(
    information: &CertificateInformation,
    references: &CertificateReferences,
    token: &TokenRef,
) -> std::result::Result<DocumentElements, DocumentError> {
    let info = information;
    let r = references;
    let work = format!(
        "/akn/eu/doc/intelligibleCertificate/{}/{}/{}/{}",
        r.issuer.name, info.certificate_type, info.certified_entity_type, r.entity.party.name
    );
    let expression = format!("{work}/{}", info.certificate_expression);
    let identification = frbr_identification(
        &work,
        &expression,
        &info.certificate_date,
        &r.issuer_representative.eid,
        &info.identification,
    );

    let preface = format!(
        "{} Certificate issued by {} to {} in reference to {}",
        info.certificate_type, r.issuer.name, r.receiver.name, r.entity.party.name
    );

    let mut elements = with_references(
        DocumentElements {
            identification,
            ..DocumentElements::new(preface)
        },
        r.slots(),
    );
    for party in &r.others {
        elements = elements.reference(other_key(party), party.to_reference());
    }

    let web3 = BodyBlock {
        p: token.to_object(),
        ..BodyBlock::new("Ethereum Token Reference")
    };
    elements = elements
        .block("information", information_block(info, &r.entity))
        .block("web3", web3)
        .block("identities", identities_block(r));
    for (name, block) in info.additional_body.iter() {
        elements = elements.block(name, block.clone());
    }
    Ok(elements)
}

fn information_block(info: &CertificateInformation, entity: &CertifiedEntity) -> BodyBlock {
    let mut certificate_entity = Map::new();
    certificate_entity.insert(
        entity.party.kind.body_tag().into(),
        mention("cert_ent_info_cert_entity", &entity.party),
    );
    certificate_entity.insert(
        "documentHashDigest".into(),
        Value::String(entity.document_hash_digest.clone()),
    );

    BodyBlock::new("Certified Entity Information")
        .field("certificateType", info.certificate_type.as_str())
        .field("certifiedEntityType", info.certified_entity_type.as_str())
        .field("certificateExpression", info.certificate_expression.as_str())
        .field(
            "docDate",
            json!({
                "@eId": "cert_ent_info_cert_date",
                "@date": info.certificate_date,
                "#": info.certificate_date,
            }),
        )
        .field("certificateEntity", Value::Object(certificate_entity))
}

fn identities_block(r: &CertificateReferences) -> BodyBlock {
    let blocks = vec![
        party_block("identities_block_cert_issuer", "identities_cert_issuer", &r.issuer, &r.issuer_role),
        party_block(
            "identities_block_cert_issuer_repr",
            "identities_cert_issuer_repr",
            &r.issuer_representative,
            &r.issuer_representative_role,
        ),
        party_block(
            "identities_block_cert_receiver",
            "identities_cert_receiver",
            &r.receiver,
            &r.receiver_role,
        ),
    ];
    BodyBlock::new("Identities").field("block", Value::Array(blocks))
}

/// Read a certificate document back into its parts.
pub fn parse_certificate(doc: &Document) -> Result<ParsedCertificate> {
    let info = reader::paragraph(doc, 1)?;
    let certificate_entity = info.child("certificateEntity").ok_or_else(|| {
        IntelligibleError::MalformedDocument("no certificateEntity".into())
    })?;
    let entity_mention = certificate_entity
        .elements()
        .find(|e| e.attr("refersTo").is_some())
        .ok_or_else(|| IntelligibleError::MalformedDocument("certified entity is not mentioned".into()))?;
    let entity = CertifiedEntity {
        party: reader::mentioned_party(doc, entity_mention)?,
        document_hash_digest: reader::child_text(certificate_entity, "documentHashDigest")?,
    };

    let token = TokenRef::from_object(&reader::paragraph(doc, 2)?.to_object());

    let mut blocks = reader::party_blocks(doc, 3)?;
    let issuer = reader::take_block(&mut blocks, "cert_issuer")?;
    let representative = reader::take_block(&mut blocks, "cert_issuer_repr")?;
    let receiver = reader::take_block(&mut blocks, "cert_receiver")?;

    let known = [
        &issuer.party,
        &issuer.role,
        &representative.party,
        &representative.role,
        &receiver.party,
        &receiver.role,
        &entity.party,
    ];
    let others = reader::other_parties(doc, &known);

    let information = CertificateInformation {
        certificate_type: reader::child_text(info, "certificateType")?,
        certified_entity_type: reader::child_text(info, "certifiedEntityType")?,
        certificate_expression: reader::child_text(info, "certificateExpression")?,
        certificate_date: reader::child_text(info, "docDate")?,
        identification: reader::identification(doc)?,
        additional_body: reader::additional_blocks(doc, 4),
    };
    let references = CertificateReferences {
        issuer: issuer.party,
        issuer_role: issuer.role,
        issuer_representative: representative.party,
        issuer_representative_role: representative.role,
        receiver: receiver.party,
        receiver_role: receiver.role,
        entity,
        others,
    };
    tracing::debug!(entity = %references.entity.party.name, "read certificate document");

    Ok(ParsedCertificate {
        information,
        references,
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use intelligible_core::{assemble, ReferenceType, Template};

    fn party(kind: ReferenceType, eid: &str, name: &str, show_as: &str) -> Party {
        Party::new(kind, eid, name, format!("/akn/{name}/"))
            .unwrap()
            .with_show_as(show_as)
    }

    fn references() -> CertificateReferences {
        CertificateReferences {
            issuer: party(ReferenceType::Organization, "#certIssuer", "CompanyX", "Issuer"),
            issuer_role: party(ReferenceType::Role, "#issuerRole", "Issuer", "IssuerRole"),
            issuer_representative: party(ReferenceType::Person, "#certIssuerRepresentative", "PersonX", "Author"),
            issuer_representative_role: party(
                ReferenceType::Role,
                "#issuerRepresentativeRole",
                "IssuerRepresentative",
                "IssuerRepresentativeRole",
            ),
            receiver: party(ReferenceType::Person, "#certReceiver", "PersonY", "Receiver"),
            receiver_role: party(ReferenceType::Role, "#receiverRole", "Receiver", "ReceiverRole"),
            entity: CertifiedEntity {
                party: party(ReferenceType::Object, "#certEntity", "softwareX", "CertifiedEntity"),
                document_hash_digest: "bO8GOuyG8g76FI7f65DtfYHG67a7fe67".into(),
            },
            others: Vec::new(),
        }
    }

    fn information() -> CertificateInformation {
        CertificateInformation::new("GDPRCompliance", "software", "en@2024-05-01", "2024-05-01")
    }

    fn document() -> Document {
        let elements = certificate_elements(&information(), &references(), &TokenRef::Unissued).unwrap();
        assemble(&Template::certificate(), &elements).unwrap()
    }

    #[test]
    fn test_uris_and_preface() {
        let doc = document();

        assert_eq!(
            doc.find_by_eid("frbrexpression__frbrthis").and_then(|e| e.attr("value")),
            Some("/akn/eu/doc/intelligibleCertificate/CompanyX/GDPRCompliance/software/softwareX/en@2024-05-01/!main")
        );
        assert_eq!(
            doc.find_by_eid("frbrexpression__frbrauthor_1").and_then(|e| e.attr("href")),
            Some("#certIssuerRepresentative")
        );
        let title = doc
            .find_by_eid("preface__longTitle_1")
            .and_then(|t| t.child("p"))
            .map(|p| p.text());
        assert_eq!(
            title.as_deref(),
            Some("GDPRCompliance Certificate issued by CompanyX to PersonY in reference to softwareX")
        );
    }

    #[test]
    fn test_entity_paragraph() {
        let doc = document();

        let mention = doc.find_by_eid("cert_ent_info_cert_entity").unwrap();
        assert_eq!(mention.name, "object");
        assert_eq!(mention.attr("refersTo"), Some("#certEntity"));
        assert_eq!(mention.text(), "softwareX");
        assert_eq!(doc.value_by_eid("tblock_2__heading").as_deref(), Some("Ethereum Token Reference"));
        assert_eq!(
            doc.find_by_eid("identities_cert_issuer").map(|e| e.name.as_str()),
            Some("organization")
        );
        assert!(intelligible_core::duplicate_eids(doc.root()).is_empty());
    }

    #[test]
    fn test_parse_round_trip() {
        let doc = document();
        let parsed = parse_certificate(&doc).unwrap();

        assert_eq!(parsed.information.certificate_type, "GDPRCompliance");
        assert_eq!(parsed.information.certified_entity_type, "software");
        assert_eq!(parsed.information.certificate_date, "2024-05-01");
        assert_eq!(parsed.references.entity, references().entity);
        assert_eq!(parsed.references.issuer, references().issuer);
        assert_eq!(parsed.references.receiver_role, references().receiver_role);
        assert!(parsed.references.others.is_empty());

        let rebuilt = certificate_elements(&parsed.information, &parsed.references, &parsed.token).unwrap();
        let rebuilt = assemble(&Template::certificate(), &rebuilt).unwrap();
        assert_eq!(rebuilt.finalize_no_conclusions(), doc.finalize_no_conclusions());
    }

    #[test]
    fn test_parse_from_text() {
        let text = document().finalize();
        let doc = Document::parse(&text, Template::certificate().kind()).unwrap();
        let parsed = parse_certificate(&doc).unwrap();
        assert_eq!(parsed.references.entity.document_hash_digest, "bO8GOuyG8g76FI7f65DtfYHG67a7fe67");
    }

    #[test]
    fn test_entity_notation() {
        let entity: CertifiedEntity = serde_json::from_value(json!({
            "type": "TLCObject",
            "name": "softwareX",
            "documentHashDigest": "bO8GOuyG8g76FI7f65DtfYHG67a7fe67",
            "@eId": "#certEntity",
            "@href": "/akn/softwareX/",
            "@showAs": "CertifiedEntity",
        }))
        .unwrap();
        assert_eq!(entity, references().entity);
    }

    #[test]
    fn test_akn_uri() {
        assert_eq!(
            certificate_akn_uri("softwareX"),
            "/akn/eu/intelligibleCertificate/document/softwareX/decentralizedCertificate/nonFungible.akn"
        );
    }
}
