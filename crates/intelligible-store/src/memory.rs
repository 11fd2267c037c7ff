//! In-memory implementation of the DocumentStore trait.
//!
//! Primarily for tests. Same semantics as SQLite, no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::cid::DocumentCid;
use crate::error::{Result, StoreError};
use crate::traits::{now_millis, DocumentStore, PutResult, StoredDocument};

/// In-memory store. All data is lost when the store is dropped.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    documents: HashMap<DocumentCid, StoredDocument>,
    /// Insertion order.
    order: Vec<DocumentCid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(&self, text: &str) -> Result<PutResult> {
        let cid = DocumentCid::of(text);
        let mut inner = self.write()?;

        if inner.documents.contains_key(&cid) {
            return Ok(PutResult {
                cid,
                inserted: false,
            });
        }

        inner.documents.insert(
            cid,
            StoredDocument {
                cid,
                text: text.to_string(),
                stored_at: now_millis(),
            },
        );
        inner.order.push(cid);
        tracing::debug!(%cid, bytes = text.len(), "stored document");

        Ok(PutResult {
            cid,
            inserted: true,
        })
    }

    async fn get(&self, cid: &DocumentCid) -> Result<Option<String>> {
        Ok(self.read()?.documents.get(cid).map(|d| d.text.clone()))
    }

    async fn get_stored(&self, cid: &DocumentCid) -> Result<Option<StoredDocument>> {
        Ok(self.read()?.documents.get(cid).cloned())
    }

    async fn has(&self, cid: &DocumentCid) -> Result<bool> {
        Ok(self.read()?.documents.contains_key(cid))
    }

    async fn list(&self) -> Result<Vec<DocumentCid>> {
        Ok(self.read()?.order.clone())
    }
}
