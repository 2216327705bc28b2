use crate::state::PageStore;
use crate::url::Origin;

/// State owned by one crawl run
///
/// Created at run start and handed to the engine by value; nothing about a
/// run lives in globals.
#[derive(Debug, Clone)]
pub struct CrawlSession {
    origin: Origin,
    store: PageStore,
    visited_count: u64,
}

impl CrawlSession {
    /// Starts a session with an empty store
    pub fn new(origin: Origin) -> Self {
        Self::with_store(origin, PageStore::new())
    }

    /// Starts a session on top of previously recorded pages
    pub fn with_store(origin: Origin, store: PageStore) -> Self {
        Self {
            origin,
            store,
            visited_count: 0,
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PageStore {
        &mut self.store
    }

    /// Number of fetch attempts made so far, failed ones included
    pub fn visited_count(&self) -> u64 {
        self.visited_count
    }

    /// Counts one fetch attempt and returns the new total
    pub fn begin_fetch(&mut self) -> u64 {
        self.visited_count += 1;
        self.visited_count
    }
}
