use crate::error::FeedResult;
use crate::models::FeedPage;
use async_trait::async_trait;

/// Paginated source of raw contact records.
///
/// Abstracts the remote contacts service so the pass driver can run against
/// files, in-memory fixtures or a live API. Implementations own retries,
/// timeouts and authentication; a returned error ends the pass.
#[async_trait]
pub trait ContactFeed: Send + Sync {
    /// Fetch up to `max_results` records starting at `start_index`.
    ///
    /// An empty page signals the end of the feed.
    async fn fetch_page(&self, start_index: usize, max_results: usize) -> FeedResult<FeedPage>;
}
