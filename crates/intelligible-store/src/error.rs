//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored data does not match its content id, or cannot be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// The blocking task running a database call failed.
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
