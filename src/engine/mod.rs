//! Deduplication engine and pass results.

mod dedup_engine;
mod report;

pub use dedup_engine::{DedupEngine, IngestStatus};
pub use report::{DedupReport, PassStats, ReportSummary};
