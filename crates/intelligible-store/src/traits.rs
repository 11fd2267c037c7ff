//! DocumentStore trait: the abstract interface for document persistence.

use async_trait::async_trait;

use crate::cid::DocumentCid;
use crate::error::Result;

/// Result of storing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutResult {
    pub cid: DocumentCid,
    /// `false` when the same text was already stored (not an error).
    pub inserted: bool,
}

/// A stored document with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub cid: DocumentCid,
    pub text: String,
    /// Local time of the first put (Unix ms).
    pub stored_at: i64,
}

/// Async interface for storing finalized document text by content id.
///
/// The builder never talks to a store; the issuer does, after finalizing.
///
/// # Design Notes
///
/// - **Idempotent puts**: storing the same text twice returns `inserted: false`.
/// - **Verified reads**: implementations check the text against its id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a finalized document.
    async fn put(&self, text: &str) -> Result<PutResult>;

    /// Get a document's text by id.
    async fn get(&self, cid: &DocumentCid) -> Result<Option<String>>;

    /// Get a document with its bookkeeping.
    async fn get_stored(&self, cid: &DocumentCid) -> Result<Option<StoredDocument>>;

    /// Check if a document exists.
    async fn has(&self, cid: &DocumentCid) -> Result<bool>;

    /// All ids, in the order they were first stored.
    async fn list(&self) -> Result<Vec<DocumentCid>>;
}

/// Current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
