//! Error types for the unified API.

use intelligible_core::{DocumentError, ParseError};
use intelligible_store::{DocumentCid, StoreError};
use thiserror::Error;

use crate::signer::SignerError;

/// Errors that can occur while issuing, fetching, or reading documents.
#[derive(Debug, Error)]
pub enum IntelligibleError {
    /// Building or signing a document failed.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Text could not be read back as a document.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The signer could not produce or check a signature.
    #[error("signer error: {0}")]
    Signer(#[from] SignerError),

    /// No document is stored under this id.
    #[error("document not found: {0}")]
    NotFound(DocumentCid),

    /// A signature that should check out does not.
    #[error("signature by {signatory} failed verification: {reason}")]
    VerificationFailed { signatory: String, reason: String },

    /// A document lacks a section the identity or certificate reader needs.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

/// Result type for the unified API.
pub type Result<T> = std::result::Result<T, IntelligibleError>;
