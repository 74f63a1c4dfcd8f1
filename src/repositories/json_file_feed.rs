use crate::error::FeedResult;
use crate::models::{FeedPage, RawContact};
use crate::repositories::traits::ContactFeed;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// Accepted layouts of a feed file.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedFile {
    Entries(Vec<RawContact>),
    Titled {
        #[serde(default)]
        owner: Option<String>,
        entries: Vec<RawContact>,
    },
}

/// Contact feed backed by a JSON export.
///
/// The whole export is parsed once and served in pages, in file order.
#[derive(Debug, Clone, Default)]
pub struct JsonFileFeed {
    owner: Option<String>,
    entries: Vec<RawContact>,
}

impl JsonFileFeed {
    /// Build a feed from parsed records.
    pub fn new(owner: Option<String>, entries: Vec<RawContact>) -> Self {
        Self { owner, entries }
    }

    /// Parse either a JSON array of records or `{"owner": ..., "entries": [...]}`.
    pub fn from_json_str(json: &str) -> FeedResult<Self> {
        let feed = match serde_json::from_str::<FeedFile>(json)? {
            FeedFile::Entries(entries) => Self::new(None, entries),
            FeedFile::Titled { owner, entries } => Self::new(owner, entries),
        };
        tracing::debug!(records = feed.entries.len(), "Parsed contact feed");
        Ok(feed)
    }

    /// Read and parse a feed file.
    pub async fn from_path(path: impl AsRef<Path>) -> FeedResult<Self> {
        let body = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json_str(&body)
    }

    /// Total records in the export.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ContactFeed for JsonFileFeed {
    async fn fetch_page(&self, start_index: usize, max_results: usize) -> FeedResult<FeedPage> {
        if start_index >= self.entries.len() {
            return Ok(FeedPage::default());
        }

        let end = start_index.saturating_add(max_results).min(self.entries.len());
        Ok(FeedPage {
            owner: self.owner.clone(),
            entries: self.entries[start_index..end].to_vec(),
        })
    }
}
