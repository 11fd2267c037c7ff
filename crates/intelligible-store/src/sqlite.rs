//! SQLite implementation of the DocumentStore trait.
//!
//! Uses rusqlite with bundled SQLite, wrapped in async via
//! `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::cid::DocumentCid;
use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{now_millis, DocumentStore, PutResult, StoredDocument};

/// SQLite-based store.
///
/// Thread-safe via an internal Mutex. Every call runs on the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path, creating and migrating it
    /// as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&conn)
        })
        .await?
    }
}

fn row_to_stored(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Vec<u8>, String, i64)> {
    Ok((row.get("cid")?, row.get("body")?, row.get("stored_at")?))
}

/// Rebuild a stored document, checking the body against its id.
fn verified(cid: DocumentCid, body: String, stored_at: i64) -> Result<StoredDocument> {
    if !cid.matches(&body) {
        return Err(StoreError::InvalidData(format!(
            "body does not hash to {cid}"
        )));
    }
    Ok(StoredDocument {
        cid,
        text: body,
        stored_at,
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn put(&self, text: &str) -> Result<PutResult> {
        let body = text.to_string();
        let cid = DocumentCid::of(&body);

        let inserted = self
            .with_conn(move |conn| {
                let changed = conn.execute(
                    "INSERT OR IGNORE INTO documents (cid, body, size, stored_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![cid.0.as_slice(), body, body.len() as i64, now_millis()],
                )?;
                Ok(changed == 1)
            })
            .await?;

        if inserted {
            tracing::debug!(%cid, bytes = text.len(), "stored document");
        }
        Ok(PutResult { cid, inserted })
    }

    async fn get(&self, cid: &DocumentCid) -> Result<Option<String>> {
        Ok(self.get_stored(cid).await?.map(|d| d.text))
    }

    async fn get_stored(&self, cid: &DocumentCid) -> Result<Option<StoredDocument>> {
        let cid = *cid;
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT cid, body, stored_at FROM documents WHERE cid = ?1",
                    params![cid.0.as_slice()],
                    row_to_stored,
                )
                .optional()?;
            row.map(|(_, body, stored_at)| verified(cid, body, stored_at))
                .transpose()
        })
        .await
    }

    async fn has(&self, cid: &DocumentCid) -> Result<bool> {
        let cid = *cid;
        self.with_conn(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM documents WHERE cid = ?1",
                    params![cid.0.as_slice()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    async fn list(&self) -> Result<Vec<DocumentCid>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT cid FROM documents ORDER BY stored_at, rowid")?;
            let rows = stmt.query_map([], |row| row.get::<_, Vec<u8>>(0))?;

            let mut cids = Vec::new();
            for bytes in rows {
                let bytes = bytes?;
                let cid = DocumentCid::try_from(bytes.as_slice())
                    .map_err(|_| StoreError::InvalidData(format!("cid of {} bytes", bytes.len())))?;
                cids.push(cid);
            }
            Ok(cids)
        })
        .await
    }
}
