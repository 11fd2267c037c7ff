//! The Issuer: assemble, sign, finalize and persist documents.
//!
//! Every signature covers the same payload, the document text without its
//! conclusions, so signatures can be added in any order and each still
//! verifies on its own.

use std::fmt;
use std::sync::Arc;

use intelligible_core::{
    assemble, Document, DocumentConfig, DocumentElements, ReferenceId, SignatureBuilder,
    SignatureEntry, Template,
};
use intelligible_store::{DocumentCid, DocumentStore};

use crate::error::{IntelligibleError, Result};
use crate::party::Party;
use crate::signer::{verify_signature, Signer, SignerError};

/// The software that issues documents and signs them first.
#[derive(Clone)]
pub struct SoftwareIdentity {
    /// Reference id of the software, e.g. `#issuerSoftware`.
    pub eid: String,
    pub name: String,
    pub signer: Arc<dyn Signer>,
}

impl SoftwareIdentity {
    pub fn new(eid: impl Into<String>, name: impl Into<String>, signer: Arc<dyn Signer>) -> Self {
        Self {
            eid: eid.into(),
            name: name.into(),
            signer,
        }
    }
}

impl fmt::Debug for SoftwareIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareIdentity")
            .field("eid", &self.eid)
            .field("name", &self.name)
            .field("public_key", &self.signer.public_key())
            .finish()
    }
}

/// Configuration for the Issuer.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Check the software signature before storing an issued document.
    pub verify_after_issue: bool,
    /// Kind and signature policy for documents read back from the store.
    pub document: DocumentConfig,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            verify_after_issue: true,
            document: DocumentConfig::default(),
        }
    }
}

/// What checking one signature found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureOutcome {
    Verified,
    /// The signature does not match the payload or is malformed.
    Failed(String),
    /// No key this issuer can check against, e.g. a foreign software
    /// signer or a non-Ed25519 personal key.
    Unverifiable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    pub signatory: ReferenceId,
    pub outcome: SignatureOutcome,
}

/// Result of [`Issuer::verify`], one check per signature in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub checks: Vec<SignatureCheck>,
}

impl VerificationReport {
    /// At least one signature verified and none failed.
    pub fn is_valid(&self) -> bool {
        self.checks.iter().any(|c| c.outcome == SignatureOutcome::Verified)
            && !self
                .checks
                .iter()
                .any(|c| matches!(c.outcome, SignatureOutcome::Failed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = &SignatureCheck> {
        self.checks
            .iter()
            .filter(|c| matches!(c.outcome, SignatureOutcome::Failed(_)))
    }
}

/// Issues documents on behalf of one piece of software.
///
/// Provides:
/// - Building documents from elements
/// - Signing (software and personal signatures)
/// - Persisting finalized text and reading it back
/// - Verifying signatures
pub struct Issuer<S: DocumentStore> {
    software: SoftwareIdentity,
    store: Arc<S>,
    config: IssuerConfig,
}

impl<S: DocumentStore> Issuer<S> {
    pub fn new(software: SoftwareIdentity, store: S, config: IssuerConfig) -> Self {
        Self {
            software,
            store: Arc::new(store),
            config,
        }
    }

    pub fn software(&self) -> &SoftwareIdentity {
        &self.software
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Building
    // ─────────────────────────────────────────────────────────────────────────

    /// Assemble a document on `template`.
    pub fn build(&self, template: &Template, elements: &DocumentElements) -> Result<Document> {
        Ok(assemble(template, elements)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signing
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a personal signature by `person`, acting as `role`, whose public
    /// key is published at `key_href`.
    pub async fn countersign(
        &self,
        doc: &mut Document,
        person: &Party,
        role: &Party,
        key_href: &str,
        signer: &dyn Signer,
        timestamp: &str,
    ) -> Result<()> {
        let payload = doc.finalize_no_conclusions();
        let signature = signer.sign(payload.as_bytes()).await?;

        let entry = SignatureBuilder::new(person.eid.as_str(), person.name.as_str())
            .role(role.eid.as_str(), role.name.as_str())
            .public_key(key_href, signer.public_key())
            .timestamp(timestamp)
            .signature(signature)
            .build()?;
        doc.add_signature(entry)?;

        tracing::debug!(signatory = %person.eid, "countersigned document");
        Ok(())
    }

    /// Sign with the software signer, finalize, and store.
    ///
    /// `doc` only takes the software signature once it is stored; on any
    /// error it is left as it was.
    pub async fn issue(&self, doc: &mut Document) -> Result<DocumentCid> {
        let payload = doc.finalize_no_conclusions();
        let signature = self.software.signer.sign(payload.as_bytes()).await?;
        let mut signed = doc.clone();
        signed.add_sw_signature(&self.software.eid, &self.software.name, &signature)?;

        if self.config.verify_after_issue {
            verify_signature(&self.software.signer.public_key(), payload.as_bytes(), &signature)
                .map_err(|e| IntelligibleError::VerificationFailed {
                    signatory: self.software.eid.clone(),
                    reason: e.to_string(),
                })?;
        }

        let cid = self.publish(&signed).await?;
        *doc = signed;
        tracing::debug!(%cid, signatures = doc.signatures().len(), "issued document");
        Ok(cid)
    }

    /// Store the finalized text as it is, without signing.
    pub async fn publish(&self, doc: &Document) -> Result<DocumentCid> {
        let text = doc.finalize();
        let put = self.store.put(&text).await?;
        if !put.inserted {
            tracing::debug!(cid = %put.cid, "document already stored");
        }
        Ok(put.cid)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reading
    // ─────────────────────────────────────────────────────────────────────────

    /// Read a stored document back.
    pub async fn fetch(&self, cid: &DocumentCid) -> Result<Document> {
        let text = self
            .store
            .get(cid)
            .await?
            .ok_or(IntelligibleError::NotFound(*cid))?;
        let doc = Document::try_parse(&text, self.config.document.kind)?;
        Ok(doc.with_duplicate_signatures(self.config.document.duplicate_signatures))
    }

    /// Check every signature against the document's payload.
    ///
    /// Software signatures are checked when they name this issuer's
    /// software; personal signatures when their public key is Ed25519 hex.
    pub fn verify(&self, doc: &Document) -> VerificationReport {
        let payload = doc.finalize_no_conclusions();
        let checks = doc
            .signatures()
            .into_iter()
            .map(|entry| {
                let outcome = self.check(&entry, payload.as_bytes());
                if let SignatureOutcome::Failed(reason) = &outcome {
                    tracing::warn!(signatory = %entry.signatory(), %reason, "signature failed verification");
                }
                SignatureCheck {
                    signatory: entry.signatory().clone(),
                    outcome,
                }
            })
            .collect();
        VerificationReport { checks }
    }

    fn check(&self, entry: &SignatureEntry, payload: &[u8]) -> SignatureOutcome {
        let public_key = match entry {
            SignatureEntry::Software(sw) if sw.signatory.as_str() == self.software.eid => {
                self.software.signer.public_key()
            }
            SignatureEntry::Software(_) => return SignatureOutcome::Unverifiable,
            SignatureEntry::Personal(p) => p.public_key.clone(),
        };
        match verify_signature(&public_key, payload, entry.signature()) {
            Ok(()) => SignatureOutcome::Verified,
            Err(SignerError::InvalidPublicKey(_)) => SignatureOutcome::Unverifiable,
            Err(e) => SignatureOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Ed25519Signer;
    use intelligible_core::{BodyBlock, Reference, ReferenceType};
    use intelligible_core::DuplicateSignaturePolicy;
    use intelligible_store::{MemoryStore, PutResult, StoreError, StoredDocument};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose first put fails.
    #[derive(Default)]
    struct FailFirstPut {
        inner: MemoryStore,
        failed: AtomicBool,
    }

    #[async_trait::async_trait]
    impl DocumentStore for FailFirstPut {
        async fn put(&self, text: &str) -> intelligible_store::Result<PutResult> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(StoreError::InvalidData("disk full".into()));
            }
            self.inner.put(text).await
        }

        async fn get(&self, cid: &DocumentCid) -> intelligible_store::Result<Option<String>> {
            self.inner.get(cid).await
        }

        async fn get_stored(
            &self,
            cid: &DocumentCid,
        ) -> intelligible_store::Result<Option<StoredDocument>> {
            self.inner.get_stored(cid).await
        }

        async fn has(&self, cid: &DocumentCid) -> intelligible_store::Result<bool> {
            self.inner.has(cid).await
        }

        async fn list(&self) -> intelligible_store::Result<Vec<DocumentCid>> {
            self.inner.list().await
        }
    }

    fn issuer() -> Issuer<MemoryStore> {
        let signer = Arc::new(Ed25519Signer::from_seed(&[9u8; 32]));
        Issuer::new(
            SoftwareIdentity::new("#issuerSoftware", "IntelligibleSuite@0.1.0", signer),
            MemoryStore::new(),
            IssuerConfig::default(),
        )
    }

    fn elements() -> DocumentElements {
        DocumentElements::new("Alice Identity")
            .reference(
                "idIssuer",
                Reference::new("/doc/alice").with_kind(ReferenceType::Person),
            )
            .block("information", BodyBlock::new("Personal Information").field("name", "Alice"))
    }

    fn alice() -> (Party, Party) {
        (
            Party::new(ReferenceType::Person, "#alice", "Alice", "/person/alice").unwrap(),
            Party::new(ReferenceType::Role, "#receiverRole", "Receiver", "/roles/receiver").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_issue_fetch_verify() {
        let issuer = issuer();
        let mut doc = issuer.build(&Template::identity(), &elements()).unwrap();
        let cid = issuer.issue(&mut doc).await.unwrap();

        let fetched = issuer.fetch(&cid).await.unwrap();
        assert_eq!(fetched.finalize(), doc.finalize());

        let report = issuer.verify(&fetched);
        assert!(report.is_valid());
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].signatory.as_str(), "#issuerSoftware");
    }

    #[tokio::test]
    async fn test_countersign_then_issue() {
        let issuer = issuer();
        let (person, role) = alice();
        let alice_key = Ed25519Signer::from_seed(&[1u8; 32]);

        let mut doc = issuer.build(&Template::identity(), &elements()).unwrap();
        issuer
            .countersign(&mut doc, &person, &role, "/keys/alice", &alice_key, "1700000000000")
            .await
            .unwrap();
        let cid = issuer.issue(&mut doc).await.unwrap();

        let fetched = issuer.fetch(&cid).await.unwrap();
        let report = issuer.verify(&fetched);
        assert!(report.is_valid());
        assert_eq!(
            report.checks.iter().map(|c| c.signatory.as_str()).collect::<Vec<_>>(),
            vec!["#alice", "#issuerSoftware"]
        );
        assert!(report.checks.iter().all(|c| c.outcome == SignatureOutcome::Verified));
    }

    #[tokio::test]
    async fn test_tampered_payload_fails() {
        let issuer = issuer();
        let mut doc = issuer.build(&Template::identity(), &elements()).unwrap();
        issuer.issue(&mut doc).await.unwrap();

        let text = doc.finalize().replace("Alice</name>", "Mallory</name>");
        let forged = Document::parse(&text, doc.kind()).unwrap();
        let report = issuer.verify(&forged);

        assert!(!report.is_valid());
        assert_eq!(report.failures().count(), 1);
    }

    #[tokio::test]
    async fn test_foreign_software_unverifiable() {
        let issuer = issuer();
        let mut doc = issuer.build(&Template::identity(), &elements()).unwrap();
        doc.add_sw_signature("#otherSoftware", "Other@1.0", "00").unwrap();

        let report = issuer.verify(&doc);
        assert_eq!(report.checks[0].outcome, SignatureOutcome::Unverifiable);
        assert!(!report.is_valid());
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let issuer = issuer();
        let cid = DocumentCid::of("never issued");
        assert!(matches!(issuer.fetch(&cid).await, Err(IntelligibleError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_unparseable() {
        let issuer = issuer();
        let put = issuer.store().put("<notADocument/>").await.unwrap();
        assert!(matches!(issuer.fetch(&put.cid).await, Err(IntelligibleError::Parse(_))));
    }

    #[tokio::test]
    async fn test_reissue_is_idempotent() {
        let issuer = issuer();
        let doc = issuer.build(&Template::identity(), &elements()).unwrap();

        let a = issuer.publish(&doc).await.unwrap();
        let b = issuer.publish(&doc).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(issuer.store().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_store_leaves_document_unsigned() {
        let signer = Arc::new(Ed25519Signer::from_seed(&[9u8; 32]));
        let issuer = Issuer::new(
            SoftwareIdentity::new("#issuerSoftware", "IntelligibleSuite@0.1.0", signer),
            FailFirstPut::default(),
            IssuerConfig::default(),
        );
        let mut doc = issuer
            .build(&Template::identity(), &elements())
            .unwrap()
            .with_duplicate_signatures(DuplicateSignaturePolicy::Reject);

        assert!(matches!(issuer.issue(&mut doc).await, Err(IntelligibleError::Store(_))));
        assert!(doc.signatures().is_empty());
        assert!(doc.conclusions().is_none());

        let cid = issuer.issue(&mut doc).await.unwrap();
        assert_eq!(doc.signatures().len(), 1);
        assert!(issuer.verify(&issuer.fetch(&cid).await.unwrap()).is_valid());
    }
}
