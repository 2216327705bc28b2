/// Page status definitions for tracking crawl progress
///
/// This module defines the states a page can be in during the crawl and the
/// transitions allowed between them.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Represents the current status of a page in the crawl
///
/// `Visited` and `Broken` are terminal. A page is never re-fetched or
/// re-classified once it reaches either of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageStatus {
    /// Page has been observed as a link target but not fetched yet
    #[default]
    Unvisited,

    /// Page was fetched successfully
    Visited,

    /// Page returned HTTP 404
    Broken {
        /// Canonical URLs of the pages linking here
        referrers: BTreeSet<String>,
    },
}

impl PageStatus {
    /// Creates a broken status, optionally seeded with its first referrer
    pub fn broken(found_on: Option<&str>) -> Self {
        Self::Broken {
            referrers: found_on.map(str::to_string).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Unvisited => StatusKind::Unvisited,
            Self::Visited => StatusKind::Visited,
            Self::Broken { .. } => StatusKind::Broken,
        }
    }

    pub fn is_unvisited(&self) -> bool {
        matches!(self, Self::Unvisited)
    }

    pub fn is_visited(&self) -> bool {
        matches!(self, Self::Visited)
    }

    pub fn is_broken(&self) -> bool {
        matches!(self, Self::Broken { .. })
    }

    /// Returns true once the page has reached a terminal status
    pub fn is_resolved(&self) -> bool {
        !self.is_unvisited()
    }

    /// Referring pages, present only for broken pages
    pub fn referrers(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Broken { referrers } => Some(referrers),
            _ => None,
        }
    }
}

/// Field-less discriminant of [`PageStatus`]
///
/// This is also the persisted status string. The legacy names `CRAWLED` and
/// `ERRORED` are accepted when reading older snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    #[serde(rename = "UNVISITED", alias = "UNCRAWLED")]
    Unvisited,
    #[serde(rename = "VISITED", alias = "CRAWLED")]
    Visited,
    #[serde(rename = "BROKEN", alias = "ERRORED")]
    Broken,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvisited => "UNVISITED",
            Self::Visited => "VISITED",
            Self::Broken => "BROKEN",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unvisited() {
        assert_eq!(PageStatus::default(), PageStatus::Unvisited);
    }

    #[test]
    fn test_is_resolved() {
        assert!(!PageStatus::Unvisited.is_resolved());
        assert!(PageStatus::Visited.is_resolved());
        assert!(PageStatus::broken(None).is_resolved());
    }

    #[test]
    fn test_broken_seeds_referrer() {
        let status = PageStatus::broken(Some("https://site.com/"));
        let referrers = status.referrers().unwrap();
        assert_eq!(referrers.len(), 1);
        assert!(referrers.contains("https://site.com/"));

        assert!(PageStatus::broken(None).referrers().unwrap().is_empty());
    }

    #[test]
    fn test_referrers_only_for_broken() {
        assert!(PageStatus::Visited.referrers().is_none());
        assert!(PageStatus::Unvisited.referrers().is_none());
    }

    #[test]
    fn test_kind() {
        assert_eq!(PageStatus::Unvisited.kind(), StatusKind::Unvisited);
        assert_eq!(PageStatus::Visited.kind(), StatusKind::Visited);
        assert_eq!(PageStatus::broken(None).kind(), StatusKind::Broken);
    }

    #[test]
    fn test_kind_serialized_names() {
        assert_eq!(
            serde_json::to_string(&StatusKind::Visited).unwrap(),
            "\"VISITED\""
        );
        assert_eq!(
            serde_json::to_string(&StatusKind::Broken).unwrap(),
            "\"BROKEN\""
        );
    }

    #[test]
    fn test_kind_accepts_legacy_names() {
        let crawled: StatusKind = serde_json::from_str("\"CRAWLED\"").unwrap();
        let errored: StatusKind = serde_json::from_str("\"ERRORED\"").unwrap();
        assert_eq!(crawled, StatusKind::Visited);
        assert_eq!(errored, StatusKind::Broken);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", StatusKind::Broken), "BROKEN");
        assert_eq!(format!("{}", StatusKind::Unvisited), "UNVISITED");
    }
}
