//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageStatus`: status of one page (unvisited, visited, broken with referrers)
//! - `PageStore`: canonical URL to status mapping with enforced transitions
//! - `CrawlSession`: the store, the origin, and the fetch-attempt counter for one run

mod page_state;
mod session;
mod store;

// Re-export main types
pub use page_state::{PageStatus, StatusKind};
pub use session::CrawlSession;
pub use store::{PageStore, StoreError, StoreResult};
