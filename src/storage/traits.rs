//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot backends and
//! associated error types.

use crate::storage::Snapshot;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Snapshot {path} is not valid JSON: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable home of the crawl results
///
/// Both artifacts are replaced wholesale on every write; there is no append
/// or patch format.
pub trait SnapshotStorage {
    /// Reads the last written snapshot, or `None` if there is none yet
    fn load_snapshot(&self) -> StorageResult<Option<Snapshot>>;

    /// Replaces the snapshot
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> StorageResult<()>;

    /// Replaces the list of broken URLs
    fn write_errored(&mut self, urls: &[String]) -> StorageResult<()>;
}
