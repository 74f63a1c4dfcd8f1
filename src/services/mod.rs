//! Application service layer.
//!
//! Services orchestrate the contact feed and the deduplication engine. They
//! provide a clean boundary between the entry point and the data source.

mod dedup_service;

pub use dedup_service::{DedupService, DedupServiceImpl};
