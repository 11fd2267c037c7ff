//! # Intelligible Store
//!
//! Storage for finalized documents, addressed by the Blake3 hash of their
//! text. The [`DocumentStore`] trait keeps callers storage-agnostic;
//! [`SqliteStore`] is the persistent backend and [`MemoryStore`] serves tests.
//!
//! ## Key Types
//!
//! - [`DocumentStore`] - The async trait for all storage operations
//! - [`DocumentCid`] - Content id of a finalized text
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`PutResult`] - Result of storing a document
//!
//! ## Usage
//!
//! ```rust,no_run
//! use intelligible_store::{DocumentStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("documents.db").unwrap();
//!     let put = store.put("<?xml version=\"1.0\"?>\n<metaDoc/>").await.unwrap();
//!     let text = store.get(&put.cid).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent puts**: storing the same text twice returns `inserted: false`
//! - **Verified reads**: a body that no longer hashes to its id is an error

pub mod cid;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use cid::DocumentCid;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, PutResult, StoredDocument};
