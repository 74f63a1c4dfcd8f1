use async_trait::async_trait;
use contact_dedup::error::{FeedError, FeedResult};
use contact_dedup::models::{FeedPage, RawContact};
use contact_dedup::repositories::ContactFeed;
use std::sync::{Arc, Mutex};

/// Mock contact feed for testing.
///
/// Serves an in-memory list of records in pages, records every requested
/// `(start_index, max_results)` pair and can be told to fail at a given start
/// index to simulate an upstream outage mid-pass.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockContactFeed {
    contacts: Arc<Mutex<Vec<RawContact>>>,
    owner: Option<String>,
    requests: Arc<Mutex<Vec<(usize, usize)>>>,
    fail_at: Arc<Mutex<Option<usize>>>,
}

#[allow(dead_code)]
impl MockContactFeed {
    /// Create a new empty MockContactFeed.
    pub fn new() -> Self {
        Self {
            contacts: Arc::new(Mutex::new(Vec::new())),
            owner: None,
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_at: Arc::new(Mutex::new(None)),
        }
    }

    /// Set the owner title reported on every page.
    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    /// Append a record to the feed.
    pub fn add_contact(&self, contact: RawContact) {
        self.contacts.lock().unwrap().push(contact);
    }

    /// Append multiple records to the feed.
    pub fn add_contacts(&self, contacts_list: Vec<RawContact>) {
        self.contacts.lock().unwrap().extend(contacts_list);
    }

    /// Fail the fetch whose start index equals `start_index`.
    pub fn fail_at(&self, start_index: usize) {
        *self.fail_at.lock().unwrap() = Some(start_index);
    }

    /// All page requests made so far.
    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of page requests made so far.
    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockContactFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactFeed for MockContactFeed {
    async fn fetch_page(&self, start_index: usize, max_results: usize) -> FeedResult<FeedPage> {
        self.requests
            .lock()
            .unwrap()
            .push((start_index, max_results));

        if *self.fail_at.lock().unwrap() == Some(start_index) {
            return Err(FeedError::Upstream(format!(
                "service unavailable at {}",
                start_index
            )));
        }

        let contacts = self.contacts.lock().unwrap();
        let entries: Vec<RawContact> = contacts
            .iter()
            .skip(start_index)
            .take(max_results)
            .cloned()
            .collect();

        Ok(FeedPage {
            owner: self.owner.clone(),
            entries,
        })
    }
}
