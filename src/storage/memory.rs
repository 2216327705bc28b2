use crate::storage::{Snapshot, SnapshotStorage, StorageResult};

/// Snapshot backend that keeps everything in memory
///
/// Records how many times each artifact was written, which makes checkpoint
/// cadence observable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub snapshot: Option<Snapshot>,
    pub errored: Option<Vec<String>>,
    pub snapshot_writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing snapshot, as if left by an earlier run
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            ..Self::default()
        }
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load_snapshot(&self) -> StorageResult<Option<Snapshot>> {
        Ok(self.snapshot.clone())
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> StorageResult<()> {
        self.snapshot = Some(snapshot.clone());
        self.snapshot_writes += 1;
        Ok(())
    }

    fn write_errored(&mut self, urls: &[String]) -> StorageResult<()> {
        self.errored = Some(urls.to_vec());
        Ok(())
    }
}
