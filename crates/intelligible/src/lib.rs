//! # Intelligible
//!
//! The unified API for issuing Akoma Ntoso identity and certificate
//! documents: build them from typed parts, sign them, store them by
//! content id, and read and verify them again.
//!
//! ## Overview
//!
//! - **Builders**: [`identity_elements`] and [`certificate_elements`] lay out
//!   the identification, references, preface and body of each document type
//! - **Readers**: [`parse_identity`] and [`parse_certificate`] recover those
//!   parts from a parsed [`Document`]
//! - **Signing**: any [`Signer`] can countersign; [`Ed25519Signer`] is the
//!   software signer
//! - **Issuer**: [`Issuer`] runs assemble, sign, finalize and store, and the
//!   reverse fetch and verify path
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use intelligible::core::{DocumentElements, Reference, ReferenceType, Template};
//! use intelligible::store::SqliteStore;
//! use intelligible::{Ed25519Signer, Issuer, IssuerConfig, SoftwareIdentity};
//!
//! async fn example() {
//!     let software = SoftwareIdentity::new(
//!         "#issuerSoftware",
//!         "IntelligibleSuite@0.1.0",
//!         Arc::new(Ed25519Signer::generate()),
//!     );
//!     let store = SqliteStore::open("documents.db").unwrap();
//!     let issuer = Issuer::new(software, store, IssuerConfig::default());
//!
//!     let elements = DocumentElements::new("Alice Identity").reference(
//!         "idIssuer",
//!         Reference::new("/doc/alice").with_kind(ReferenceType::Person),
//!     );
//!     let mut doc = issuer.build(&Template::identity(), &elements).unwrap();
//!     let cid = issuer.issue(&mut doc).await.unwrap();
//!
//!     let fetched = issuer.fetch(&cid).await.unwrap();
//!     assert!(issuer.verify(&fetched).is_valid());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `intelligible::core` - Document primitives (Element, Document, Template, etc.)
//! - `intelligible::store` - Storage abstraction and SQLite

pub mod certificate;
pub mod error;
pub mod identity;
pub mod issuer;
pub mod party;
pub mod signer;

mod compose;
mod reader;

// Re-export component crates
pub use intelligible_core as core;
pub use intelligible_store as store;

// Re-export main types for convenience
pub use certificate::{
    certificate_akn_uri, certificate_elements, parse_certificate, CertificateInformation,
    CertificateReferences, CertifiedEntity, ParsedCertificate,
};
pub use error::{IntelligibleError, Result};
pub use identity::{
    identity_akn_uri, identity_elements, parse_identity, IdentityInformation,
    IdentityReferences, ParsedIdentity,
};
pub use issuer::{
    Issuer, IssuerConfig, SignatureCheck, SignatureOutcome, SoftwareIdentity, VerificationReport,
};
pub use party::Party;
pub use signer::{verify_signature, Ed25519Signer, Signer, SignerError};

// Re-export commonly used core types
pub use intelligible_core::{
    Document, DocumentElements, DocumentKind, ReferenceType, Template, TokenRef,
};
pub use intelligible_store::DocumentCid;
