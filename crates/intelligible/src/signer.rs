//! The signing seam.
//!
//! Documents are signed over their no-conclusions text. A [`Signer`] turns
//! that text into a hex signature; [`Ed25519Signer`] is the software signer
//! used by the issuer, and [`verify_signature`] checks its output.

use std::fmt;

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};
use thiserror::Error;

/// Errors from producing or checking a signature.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The signature is well formed but does not match the payload.
    #[error("signature does not match payload")]
    Mismatch,

    /// A remote or hardware signer could not be reached.
    #[error("signer unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can sign a document payload.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Hex-encoded public key, as written into personal signatures.
    fn public_key(&self) -> String;

    /// Sign `payload`, returning the hex-encoded signature.
    async fn sign(&self, payload: &[u8]) -> Result<String, SignerError>;
}

/// Ed25519 software signer.
#[derive(Clone)]
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Sign synchronously.
    pub fn sign_bytes(&self, payload: &[u8]) -> String {
        hex::encode(self.signing_key.sign(payload).to_bytes())
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signer({}...)", &self.public_key()[..16])
    }
}

#[async_trait]
impl Signer for Ed25519Signer {
    fn public_key(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    async fn sign(&self, payload: &[u8]) -> Result<String, SignerError> {
        Ok(self.sign_bytes(payload))
    }
}

/// Check a hex Ed25519 signature over `payload` against a hex public key.
pub fn verify_signature(
    public_key: &str,
    payload: &[u8],
    signature: &str,
) -> Result<(), SignerError> {
    let key_bytes: [u8; 32] = hex::decode(public_key)
        .map_err(|e| SignerError::InvalidPublicKey(e.to_string()))?
        .try_into()
        .map_err(|b: Vec<u8>| SignerError::InvalidPublicKey(format!("{} bytes", b.len())))?;
    let verifying_key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| SignerError::InvalidPublicKey(e.to_string()))?;

    let sig_bytes: [u8; 64] = hex::decode(signature)
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))?
        .try_into()
        .map_err(|b: Vec<u8>| SignerError::MalformedSignature(format!("{} bytes", b.len())))?;

    verifying_key
        .verify(payload, &Signature::from_bytes(&sig_bytes))
        .map_err(|_| SignerError::Mismatch)
}
