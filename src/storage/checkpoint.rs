//! Periodic and final persistence of the page store

use crate::state::PageStore;
use crate::storage::{merge_snapshots, SnapshotStorage, StorageResult};

/// Writes the page store to durable storage during and after a crawl
///
/// Every `interval` successful visits the snapshot on disk is merged with
/// the in-memory store and written back. At completion the in-memory store
/// replaces the snapshot outright and the broken URL list is derived from it.
#[derive(Debug)]
pub struct CheckpointWriter<S: SnapshotStorage> {
    storage: S,
    interval: u64,
    successful_visits: u64,
}

impl<S: SnapshotStorage> CheckpointWriter<S> {
    /// Creates a writer; an `interval` of 0 is treated as 1
    pub fn new(storage: S, interval: u64) -> Self {
        Self {
            storage,
            interval: interval.max(1),
            successful_visits: 0,
        }
    }

    /// Hook run after each successful visit
    ///
    /// Returns true if a checkpoint was written.
    pub fn on_visit(&mut self, store: &PageStore) -> StorageResult<bool> {
        self.successful_visits += 1;
        if self.successful_visits % self.interval != 0 {
            return Ok(false);
        }
        self.checkpoint(store)?;
        Ok(true)
    }

    /// Merges the store into the durable snapshot
    pub fn checkpoint(&mut self, store: &PageStore) -> StorageResult<()> {
        let on_disk = self.storage.load_snapshot()?.unwrap_or_default();
        let merged = merge_snapshots(on_disk, &store.to_snapshot());
        self.storage.write_snapshot(&merged)?;
        tracing::debug!(
            "Checkpoint after {} successful visits ({} pages in snapshot)",
            self.successful_visits,
            merged.len()
        );
        Ok(())
    }

    /// Writes the final snapshot and the broken URL list
    pub fn finish(&mut self, store: &PageStore) -> StorageResult<()> {
        self.storage.write_snapshot(&store.to_snapshot())?;
        self.storage.write_errored(&store.broken_urls())?;
        Ok(())
    }

    pub fn successful_visits(&self) -> u64 {
        self.successful_visits
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
