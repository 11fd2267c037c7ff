//! Test fixtures and helpers.
//!
//! Sample parties and information for identity and certificate documents,
//! plus an issuer backed by a memory store.

use std::sync::Arc;

use intelligible::{
    CertificateInformation, CertificateReferences, CertifiedEntity, Ed25519Signer,
    IdentityInformation, IdentityReferences, Issuer, IssuerConfig, Party, SoftwareIdentity,
};
use intelligible_core::{BodyBlock, DocumentElements, Reference, ReferenceType};
use intelligible_store::MemoryStore;

/// Date used by every sample document.
pub const SAMPLE_DATE: &str = "2024-05-01";

/// Seed of the sample software signer.
pub const SOFTWARE_SEED: [u8; 32] = [0x42; 32];

fn party(kind: ReferenceType, eid: &str, name: &str, href: &str, show_as: &str) -> Party {
    Party::new(kind, eid, name, href)
        .expect("fixture reference ids are well formed")
        .with_show_as(show_as)
}

/// The issuing software as a reference.
pub fn software_party() -> Party {
    party(
        ReferenceType::Object,
        "#issuerSoftware",
        "IntelligibleSuite@0.1.0",
        "/akn/eu/doc/object/software/IntelligibleSuite/ver@0.1.0.akn",
        "IssuerSoftware",
    )
}

/// Alice's document: one person reference and one information block.
pub fn alice_elements() -> DocumentElements {
    DocumentElements::new("Alice Identity")
        .reference(
            "idIssuer",
            Reference::new("/doc/alice")
                .with_kind(ReferenceType::Person)
                .with_show_as("Issuer"),
        )
        .block(
            "information",
            BodyBlock::new("Personal Information")
                .field("name", "Alice")
                .field("email", "a@x.com"),
        )
}

pub fn identity_information() -> IdentityInformation {
    IdentityInformation::new(
        "person",
        format!("DID@{SAMPLE_DATE}"),
        SAMPLE_DATE,
        "Person X",
        "person@x.com",
    )
}

/// PersonX issues an identity to PersonY.
pub fn identity_references() -> IdentityReferences {
    IdentityReferences {
        issuer: party(
            ReferenceType::Person,
            "#idIssuer",
            "PersonX",
            "/akn/eu/doc/intelligibleIdentity/person/PersonX/",
            "Issuer",
        ),
        issuer_role: party(
            ReferenceType::Role,
            "#issuerRole",
            "Issuer",
            "/akn/ontology/roles/intelligibleIdentity/issuer",
            "IssuerRole",
        ),
        issuer_representative: party(
            ReferenceType::Person,
            "#idIssuerRepresentative",
            "PersonX",
            "/akn/eu/doc/intelligibleIdentity/person/PersonX/",
            "Author",
        ),
        issuer_representative_role: party(
            ReferenceType::Role,
            "#issuerRepresentativeRole",
            "IssuerRepresentative",
            "/akn/ontology/roles/intelligibleIdentity/issuerRepresentative",
            "IssuerRepresentativeRole",
        ),
        receiver: party(
            ReferenceType::Person,
            "#idReceiver",
            "PersonY",
            "/akn/eu/doc/intelligibleIdentity/person/PersonY/",
            "Receiver",
        ),
        receiver_role: party(
            ReferenceType::Role,
            "#receiverRole",
            "Receiver",
            "/akn/ontology/roles/intelligibleIdentity/receiver",
            "ReceiverRole",
        ),
        others: vec![software_party()],
    }
}

pub fn certificate_information() -> CertificateInformation {
    CertificateInformation::new(
        "GDPRCompliance",
        "software",
        format!("en@{SAMPLE_DATE}"),
        SAMPLE_DATE,
    )
}

/// CompanyX certifies softwareX for PersonY.
pub fn certificate_references() -> CertificateReferences {
    CertificateReferences {
        issuer: party(
            ReferenceType::Organization,
            "#certIssuer",
            "CompanyX",
            "/akn/eu/doc/intelligibleIdentity/organization/CompanyX/",
            "Issuer",
        ),
        issuer_role: party(
            ReferenceType::Role,
            "#issuerRole",
            "Issuer",
            "/akn/ontology/roles/intelligibleCertificate/issuer",
            "IssuerRole",
        ),
        issuer_representative: party(
            ReferenceType::Person,
            "#certIssuerRepresentative",
            "PersonX",
            "/akn/eu/doc/intelligibleIdentity/person/PersonX/",
            "Author",
        ),
        issuer_representative_role: party(
            ReferenceType::Role,
            "#issuerRepresentativeRole",
            "IssuerRepresentative",
            "/akn/ontology/roles/intelligibleCertificate/issuerRepresentative",
            "IssuerRepresentativeRole",
        ),
        receiver: party(
            ReferenceType::Person,
            "#certReceiver",
            "PersonY",
            "/akn/eu/doc/intelligibleIdentity/person/PersonY/",
            "Receiver",
        ),
        receiver_role: party(
            ReferenceType::Role,
            "#receiverRole",
            "Receiver",
            "/akn/ontology/roles/intelligibleCertificate/receiver",
            "ReceiverRole",
        ),
        entity: CertifiedEntity {
            party: party(
                ReferenceType::Object,
                "#certEntity",
                "softwareX",
                "/some/uri/softwareX",
                "CertifiedEntity",
            ),
            document_hash_digest: "bO8GOuyG8g76FI7f65DtfYHG67a7fe67".into(),
        },
        others: vec![software_party()],
    }
}

/// A signer derived from a one-byte seed, for multi-party tests.
pub fn signer(seed: u8) -> Ed25519Signer {
    Ed25519Signer::from_seed(&[seed; 32])
}

/// An issuer with a deterministic software key and a memory store.
pub struct TestFixture {
    pub issuer: Issuer<MemoryStore>,
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_config(IssuerConfig::default())
    }

    pub fn with_config(config: IssuerConfig) -> Self {
        let software = software_party();
        let identity = SoftwareIdentity::new(
            software.eid.as_str(),
            software.name,
            Arc::new(Ed25519Signer::from_seed(&SOFTWARE_SEED)),
        );
        Self {
            issuer: Issuer::new(identity, MemoryStore::new(), config),
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
