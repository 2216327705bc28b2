//! Durable form of the page store

use crate::state::{PageStatus, StatusKind};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Snapshot of every recorded page keyed by canonical URL
///
/// A `BTreeMap` keeps the written JSON ordered by URL, so successive
/// snapshots diff cleanly.
pub type Snapshot = BTreeMap<String, SnapshotEntry>;

/// One persisted page record
///
/// Serialized as `{"status": "BROKEN", "foundOn": [...]}`; `foundOn` is
/// omitted for visited pages. For unvisited pages it lists the pages that
/// queued them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub status: StatusKind,

    #[serde(
        rename = "foundOn",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_referrers"
    )]
    pub found_on: Vec<String>,
}

impl SnapshotEntry {
    pub fn visited() -> Self {
        Self {
            status: StatusKind::Visited,
            found_on: Vec::new(),
        }
    }

    pub fn broken<I, S>(found_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            status: StatusKind::Broken,
            found_on: found_on.into_iter().map(Into::into).collect(),
        }
    }

    /// A queued page that has not been fetched, with the pages that queued it
    pub fn unvisited<I, S>(found_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            status: StatusKind::Unvisited,
            found_on: found_on.into_iter().map(Into::into).collect(),
        }
    }

    /// Converts a live status; unvisited pages get no referrers here
    pub fn from_status(status: &PageStatus) -> Self {
        match status {
            PageStatus::Unvisited => Self::unvisited(Vec::<String>::new()),
            PageStatus::Visited => Self::visited(),
            PageStatus::Broken { referrers } => Self::broken(referrers.iter().cloned()),
        }
    }

    /// Converts back to a live status
    pub fn to_status(&self) -> PageStatus {
        match self.status {
            StatusKind::Unvisited => PageStatus::Unvisited,
            StatusKind::Visited => PageStatus::Visited,
            StatusKind::Broken => PageStatus::Broken {
                referrers: self.found_on.iter().cloned().collect(),
            },
        }
    }
}

/// Merges an in-memory snapshot over the one on disk
///
/// Keys only on disk are kept; on collision the in-memory entry wins.
pub fn merge_snapshots(mut on_disk: Snapshot, in_memory: &Snapshot) -> Snapshot {
    on_disk.extend(
        in_memory
            .iter()
            .map(|(url, entry)| (url.clone(), entry.clone())),
    );
    on_disk
}

/// Accepts a missing `foundOn`, `null`, or an array with `null` holes
///
/// Older snapshots recorded the root page's absent referrer as `null`.
fn deserialize_referrers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_non_destructive() {
        let mut on_disk = Snapshot::new();
        on_disk.insert("https://site.com/a".to_string(), SnapshotEntry::visited());

        let mut in_memory = Snapshot::new();
        in_memory.insert(
            "https://site.com/b".to_string(),
            SnapshotEntry::broken(["https://site.com/"]),
        );

        let merged = merge_snapshots(on_disk, &in_memory);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["https://site.com/a"].status, StatusKind::Visited);
        assert_eq!(merged["https://site.com/b"].status, StatusKind::Broken);
    }

    #[test]
    fn test_merge_in_memory_wins() {
        let mut on_disk = Snapshot::new();
        on_disk.insert(
            "https://site.com/b".to_string(),
            SnapshotEntry::broken(["https://site.com/"]),
        );

        let mut in_memory = Snapshot::new();
        in_memory.insert(
            "https://site.com/b".to_string(),
            SnapshotEntry::broken(["https://site.com/", "https://site.com/x"]),
        );

        let merged = merge_snapshots(on_disk, &in_memory);
        assert_eq!(merged["https://site.com/b"].found_on.len(), 2);
    }

    #[test]
    fn test_visited_serializes_without_found_on() {
        let json = serde_json::to_string(&SnapshotEntry::visited()).unwrap();
        assert_eq!(json, r#"{"status":"VISITED"}"#);
    }

    #[test]
    fn test_broken_serializes_found_on() {
        let json = serde_json::to_string(&SnapshotEntry::broken(["https://site.com/"])).unwrap();
        assert_eq!(json, r#"{"status":"BROKEN","foundOn":["https://site.com/"]}"#);
    }

    #[test]
    fn test_reads_legacy_snapshot() {
        let json = r#"{
            "https://site.com/": { "status": "CRAWLED" },
            "https://site.com/gone": { "status": "ERRORED", "foundOn": [null, "https://site.com/a"] }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot["https://site.com/"], SnapshotEntry::visited());
        assert_eq!(
            snapshot["https://site.com/gone"],
            SnapshotEntry::broken(["https://site.com/a"])
        );
    }

    #[test]
    fn test_unvisited_serializes_found_on() {
        let json =
            serde_json::to_string(&SnapshotEntry::unvisited(["https://site.com/a"])).unwrap();
        assert_eq!(json, r#"{"status":"UNVISITED","foundOn":["https://site.com/a"]}"#);
    }

    #[test]
    fn test_status_conversion() {
        let broken = PageStatus::broken(Some("https://site.com/"));
        let entry = SnapshotEntry::from_status(&broken);
        assert_eq!(entry.to_status(), broken);

        let unvisited = SnapshotEntry::from_status(&PageStatus::Unvisited);
        assert_eq!(unvisited.status, StatusKind::Unvisited);
        assert!(unvisited.found_on.is_empty());
        assert_eq!(
            SnapshotEntry::unvisited(["https://site.com/"]).to_status(),
            PageStatus::Unvisited
        );
    }
}
