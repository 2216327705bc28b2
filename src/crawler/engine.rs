//! Crawl engine - the traversal driver
//!
//! The engine walks the site depth-first in document order using an
//! explicit worklist, so deep link chains never grow the call stack. Each
//! popped entry is fetched at most once; the store's terminal statuses make
//! later entries for the same URL no-ops (apart from referrer bookkeeping).

use crate::config::{CapMode, CrawlerConfig};
use crate::crawler::aggregator::{record_known_broken, record_referrer};
use crate::crawler::fetcher::{FetchOutcome, PageFetcher};
use crate::crawler::parser::extract_hrefs;
use crate::state::{CrawlSession, PageStore, StatusKind};
use crate::storage::{CheckpointWriter, SnapshotStorage};
use crate::url::CrawlPolicy;
use crate::LinkrotError;

/// Limits applied to a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Maximum number of fetch attempts
    pub max_visits: u64,
    /// What to do once `max_visits` is used up
    pub cap_mode: CapMode,
}

impl From<&CrawlerConfig> for CrawlLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_visits: config.max_visits,
            cap_mode: config.cap_mode,
        }
    }
}

/// A queued page and the page it was found on (`None` for the root)
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingVisit {
    url: String,
    found_on: Option<String>,
}

/// Totals reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Fetch attempts made, failed ones included
    pub visited_count: u64,
    /// Pages in `Visited` status
    pub pages_visited: usize,
    /// Pages in `Broken` status
    pub pages_broken: usize,
    /// Queued pages never fetched
    pub pages_pending: usize,
    /// True if the visit cap cut the crawl short
    pub cap_reached: bool,
}

/// Drives one crawl from the site root to completion
pub struct CrawlEngine<F: PageFetcher, S: SnapshotStorage> {
    session: CrawlSession,
    policy: CrawlPolicy,
    fetcher: F,
    checkpoint: CheckpointWriter<S>,
    limits: CrawlLimits,
    worklist: Vec<PendingVisit>,
    cap_reached: bool,
}

impl<F: PageFetcher, S: SnapshotStorage> CrawlEngine<F, S> {
    /// Creates an engine over `store`, which is empty for a fresh crawl or
    /// seeded from a snapshot when resuming
    pub fn new(
        policy: CrawlPolicy,
        store: PageStore,
        fetcher: F,
        checkpoint: CheckpointWriter<S>,
        limits: CrawlLimits,
    ) -> Self {
        Self {
            session: CrawlSession::with_store(policy.origin().clone(), store),
            policy,
            fetcher,
            checkpoint,
            limits,
            worklist: Vec::new(),
            cap_reached: false,
        }
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    pub fn checkpoint(&self) -> &CheckpointWriter<S> {
        &self.checkpoint
    }

    /// Crawls the whole site and writes the final snapshot
    ///
    /// The worklist starts with the root on top of any frontier carried over
    /// in the store, so a resumed crawl picks up the pages it had queued.
    ///
    /// # State Machine (per popped page)
    ///
    /// 1. Already broken: record the referrer, move on
    /// 2. Already visited (and not the root), or halted by the cap: move on
    /// 3. Count the fetch attempt and apply the visit cap
    /// 4. Fetch:
    ///    - page: mark visited, checkpoint hook, record referrers of known
    ///      broken links, queue eligible links in document order
    ///    - 404: mark broken with the referring page
    ///    - anything else: drop the branch, unless it is the root
    ///
    /// # Errors
    ///
    /// Fails if the root cannot be fetched for any reason other than 404,
    /// or if a checkpoint cannot be written.
    pub async fn run(&mut self) -> Result<CrawlReport, LinkrotError> {
        let root = self.session.origin().root_url();

        let frontier = self.session.store().frontier();
        if !frontier.is_empty() {
            tracing::info!("Resuming with {} queued links", frontier.len());
        }
        // Reversed so the frontier is worked through in URL order
        self.worklist.extend(
            frontier
                .into_iter()
                .rev()
                .filter(|(url, _)| *url != root)
                .map(|(url, found_on)| PendingVisit { url, found_on }),
        );

        self.session.store_mut().observe(&root, None);
        self.worklist.push(PendingVisit {
            url: root.clone(),
            found_on: None,
        });

        let mut halted = false;
        while let Some(next) = self.worklist.pop() {
            let is_root = next.url == root;
            let status = self.session.store().status(&next.url).kind();

            if status == StatusKind::Broken {
                record_referrer(
                    self.session.store_mut(),
                    &next.url,
                    next.found_on.as_deref(),
                )?;
                continue;
            }
            if halted || (status == StatusKind::Visited && !is_root) {
                continue;
            }

            if !self.admit_fetch(&next.url) {
                // Once halted, the rest of the worklist only records referrers
                halted = self.limits.cap_mode == CapMode::Halt;
                continue;
            }

            match self.fetcher.fetch(&next.url).await {
                FetchOutcome::Page { body } => self.process_page(&next.url, &body)?,
                FetchOutcome::NotFound => self.process_not_found(&next)?,
                outcome @ FetchOutcome::Failed { .. } => {
                    if is_root {
                        return Err(LinkrotError::RootUnreachable {
                            url: next.url,
                            reason: outcome.describe(),
                        });
                    }
                    tracing::debug!("Dropping {}: {}", next.url, outcome.describe());
                }
            }
        }

        self.checkpoint.finish(self.session.store())?;

        let store = self.session.store();
        Ok(CrawlReport {
            visited_count: self.session.visited_count(),
            pages_visited: store.count(StatusKind::Visited),
            pages_broken: store.count(StatusKind::Broken),
            pages_pending: store.count(StatusKind::Unvisited),
            cap_reached: self.cap_reached,
        })
    }

    /// Counts a fetch attempt against the cap; false if it must not proceed
    ///
    /// In `Halt` mode the cap is checked before counting, so the counter
    /// never exceeds the number of real fetches. In `Prune` mode every
    /// attempt is counted and the over-cap ones are skipped.
    fn admit_fetch(&mut self, url: &str) -> bool {
        let max = self.limits.max_visits;

        if self.limits.cap_mode == CapMode::Halt && self.session.visited_count() >= max {
            tracing::warn!("Visit cap of {} reached, stopping crawl", max);
            self.cap_reached = true;
            return false;
        }

        let count = self.session.begin_fetch();
        tracing::info!("crawling page {}: {}", count, url);

        if count > max {
            if !self.cap_reached {
                tracing::warn!("Visit cap of {} exceeded, skipping remaining pages", max);
            }
            self.cap_reached = true;
            return false;
        }

        true
    }

    fn process_page(&mut self, url: &str, body: &str) -> Result<(), LinkrotError> {
        let hrefs = extract_hrefs(body);

        // A resumed crawl re-fetches the root even though it is recorded as visited
        if self.session.store().status(url).is_unvisited() {
            self.session.store_mut().mark_visited(url)?;
        }

        self.checkpoint.on_visit(self.session.store())?;

        let known_broken =
            record_known_broken(self.session.store_mut(), &self.policy, url, &hrefs)?;

        let eligible = self.policy.eligible_links(&hrefs, self.session.store());
        tracing::debug!(
            "{}: {} links, {} queued, {} to known broken pages",
            url,
            hrefs.len(),
            eligible.len(),
            known_broken
        );

        for link in &eligible {
            self.session.store_mut().observe(link, Some(url));
        }

        // Reversed so the first link in the document is popped first
        self.worklist
            .extend(eligible.into_iter().rev().map(|link| PendingVisit {
                url: link,
                found_on: Some(url.to_string()),
            }));

        Ok(())
    }

    fn process_not_found(&mut self, visit: &PendingVisit) -> Result<(), LinkrotError> {
        if !self.session.store().status(&visit.url).is_unvisited() {
            tracing::warn!(
                "{} was recorded as visited earlier but now returns 404",
                visit.url
            );
            return Ok(());
        }

        match &visit.found_on {
            Some(found_on) => tracing::info!("Broken link {} (found on {})", visit.url, found_on),
            None => tracing::info!("Broken link {}", visit.url),
        }

        self.session
            .store_mut()
            .mark_broken(&visit.url, visit.found_on.as_deref())?;
        Ok(())
    }

    /// Consumes the engine, returning the final session and the storage
    pub fn into_parts(self) -> (CrawlSession, S) {
        (self.session, self.checkpoint.into_storage())
    }
}
