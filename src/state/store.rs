//! In-memory page store keyed by canonical URL

use crate::state::page_state::{PageStatus, StatusKind};
use crate::storage::{Snapshot, SnapshotEntry};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors raised when a store update would break a status invariant
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid status transition for {url}: {from} -> {to}")]
    InvalidTransition {
        url: String,
        from: StatusKind,
        to: StatusKind,
    },

    #[error("Cannot add a referrer to {url}: page is {status}, not BROKEN")]
    NotBroken { url: String, status: StatusKind },
}

pub type StoreResult<T> = Result<T, StoreError>;

static UNVISITED: PageStatus = PageStatus::Unvisited;

/// Mapping from canonical URL to page status
///
/// Records are created the first time a URL is observed and are never
/// removed. Only `Unvisited -> Visited` and `Unvisited -> Broken` are
/// allowed; every other change is rejected with [`StoreError`].
///
/// Unvisited records also remember which pages queued them. That set is the
/// crawl frontier written to snapshots, and it is dropped once the page
/// resolves.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: HashMap<String, PageStatus>,
    queued_by: HashMap<String, BTreeSet<String>>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of `url`; never-observed URLs read as `Unvisited`
    pub fn status(&self, url: &str) -> &PageStatus {
        self.pages.get(url).unwrap_or(&UNVISITED)
    }

    /// Returns true if `url` has a record, whatever its status
    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    /// Records `url` as observed, queued by `found_on` if given
    ///
    /// Returns true if the record is new. The referrer is kept only while
    /// `url` is unvisited.
    pub fn observe(&mut self, url: &str, found_on: Option<&str>) -> bool {
        let is_new = !self.pages.contains_key(url);
        if is_new {
            self.pages.insert(url.to_string(), PageStatus::Unvisited);
        }

        if let Some(referrer) = found_on {
            if self.status(url).is_unvisited() {
                self.queued_by
                    .entry(url.to_string())
                    .or_default()
                    .insert(referrer.to_string());
            }
        }

        is_new
    }

    /// Pages that queued `url`, while it is still unvisited
    pub fn queued_by(&self, url: &str) -> Option<&BTreeSet<String>> {
        self.queued_by.get(url)
    }

    /// Every unvisited page paired with each page that queued it
    ///
    /// Pages with no recorded referrer appear once with `None`. Sorted by
    /// URL, then referrer.
    pub fn frontier(&self) -> Vec<(String, Option<String>)> {
        let mut pending: Vec<&String> = self
            .pages
            .iter()
            .filter(|(_, status)| status.is_unvisited())
            .map(|(url, _)| url)
            .collect();
        pending.sort();

        let mut frontier = Vec::new();
        for url in pending {
            match self.queued_by.get(url) {
                Some(referrers) if !referrers.is_empty() => frontier.extend(
                    referrers
                        .iter()
                        .map(|referrer| (url.clone(), Some(referrer.clone()))),
                ),
                _ => frontier.push((url.clone(), None)),
            }
        }
        frontier
    }

    pub fn mark_visited(&mut self, url: &str) -> StoreResult<()> {
        self.resolve(url, PageStatus::Visited)
    }

    /// Marks `url` broken, seeding its referrers with `found_on` if given
    pub fn mark_broken(&mut self, url: &str, found_on: Option<&str>) -> StoreResult<()> {
        self.resolve(url, PageStatus::broken(found_on))
    }

    fn resolve(&mut self, url: &str, next: PageStatus) -> StoreResult<()> {
        let current = self.pages.entry(url.to_string()).or_default();
        if current.is_resolved() {
            return Err(StoreError::InvalidTransition {
                url: url.to_string(),
                from: current.kind(),
                to: next.kind(),
            });
        }
        *current = next;
        self.queued_by.remove(url);
        Ok(())
    }

    /// Adds `referrer` to a broken page's referrer set
    ///
    /// Returns true if the set grew, false if `referrer` was already there.
    pub fn add_referrer(&mut self, url: &str, referrer: &str) -> StoreResult<bool> {
        match self.pages.get_mut(url) {
            Some(PageStatus::Broken { referrers }) => {
                if referrers.contains(referrer) {
                    Ok(false)
                } else {
                    Ok(referrers.insert(referrer.to_string()))
                }
            }
            other => Err(StoreError::NotBroken {
                url: url.to_string(),
                status: other.map(|s| s.kind()).unwrap_or(StatusKind::Unvisited),
            }),
        }
    }

    /// All broken URLs, sorted
    pub fn broken_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .pages
            .iter()
            .filter(|(_, status)| status.is_broken())
            .map(|(url, _)| url.clone())
            .collect();
        urls.sort();
        urls
    }

    pub fn count(&self, kind: StatusKind) -> usize {
        self.pages.values().filter(|s| s.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageStatus)> {
        self.pages.iter().map(|(url, status)| (url.as_str(), status))
    }

    /// Durable form of the store
    ///
    /// Unvisited records carry the pages that queued them as `foundOn`, so a
    /// resumed crawl can rebuild its frontier.
    pub fn to_snapshot(&self) -> Snapshot {
        self.pages
            .iter()
            .map(|(url, status)| {
                let entry = match status {
                    PageStatus::Unvisited => SnapshotEntry::unvisited(
                        self.queued_by.get(url).into_iter().flatten().cloned(),
                    ),
                    resolved => SnapshotEntry::from_status(resolved),
                };
                (url.clone(), entry)
            })
            .collect()
    }

    /// Rebuilds a store, frontier included, from a durable snapshot
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut store = Self::new();
        for (url, entry) in snapshot {
            if entry.status == StatusKind::Unvisited && !entry.found_on.is_empty() {
                store
                    .queued_by
                    .insert(url.clone(), entry.found_on.iter().cloned().collect());
            }
            store.pages.insert(url.clone(), entry.to_status());
        }
        store
    }
}
