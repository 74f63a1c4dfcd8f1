//! Deduplication service layer.
//!
//! Pages through a contact feed and feeds every record, in delivery order, to a
//! fresh [`DedupEngine`].

use crate::config::Config;
use crate::engine::{DedupEngine, DedupReport};
use crate::error::{DedupError, DedupResult};
use crate::filter::EmailFilter;
use crate::repositories::ContactFeed;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Runs complete deduplication passes.
#[async_trait]
pub trait DedupService: Send + Sync {
    /// Read the whole feed and return the pass report.
    ///
    /// A feed failure aborts the pass; partial results are discarded.
    async fn run(&self) -> DedupResult<DedupReport>;
}

/// Default implementation of DedupService.
pub struct DedupServiceImpl {
    feed: Arc<dyn ContactFeed>,
    filter: EmailFilter,
    page_size: usize,
}

impl DedupServiceImpl {
    /// Create a new dedup service.
    pub fn new(feed: Arc<dyn ContactFeed>, filter: EmailFilter, page_size: usize) -> Self {
        Self {
            feed,
            filter,
            page_size: page_size.max(1),
        }
    }

    /// Create a service from loaded configuration, compiling the ignore rules.
    ///
    /// Unusable rules surface as [`DedupError::Config`].
    pub fn from_config(feed: Arc<dyn ContactFeed>, config: &Config) -> DedupResult<Self> {
        let filter = EmailFilter::new(&config.ignore_rules)?;
        Ok(Self::new(feed, filter, config.page_size))
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[async_trait]
impl DedupService for DedupServiceImpl {
    async fn run(&self) -> DedupResult<DedupReport> {
        let mut engine = DedupEngine::new(self.filter.clone());
        let mut start_index = 0;

        info!(
            page_size = self.page_size,
            "Reading contacts feed, this may take a while"
        );

        loop {
            let page = self
                .feed
                .fetch_page(start_index, self.page_size)
                .await
                .map_err(|source| {
                    error!(start_index, error = %source, "Feed page fetch failed");
                    DedupError::Feed {
                        start_index,
                        source,
                    }
                })?;

            if page.is_empty() {
                debug!(start_index, "Reached end of feed");
                break;
            }

            if let Some(owner) = page.owner {
                engine.set_owner(owner);
            }
            engine.ingest_all(&page.entries);

            start_index += self.page_size;
            debug!(start_index, "Advanced feed start index");
        }

        Ok(engine.finish())
    }
}
