//! Storage module for persisting crawl results
//!
//! This module handles:
//! - The durable snapshot format (`results.json`) and its merge rule
//! - The derived broken URL list (`errored.json`)
//! - Periodic checkpoints during a crawl and the final write at completion

mod checkpoint;
mod json;
mod memory;
mod snapshot;
mod traits;

pub use checkpoint::CheckpointWriter;
pub use json::JsonFileStorage;
pub use memory::MemoryStorage;
pub use snapshot::{merge_snapshots, Snapshot, SnapshotEntry};
pub use traits::{SnapshotStorage, StorageError, StorageResult};
