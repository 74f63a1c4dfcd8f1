//! Contact Dedup - incremental entity resolution for paginated contact feeds.
//!
//! Raw contact records (a display name, emails with a primary flag, phones)
//! arrive in delivery order. Each one is filtered against configured email
//! ignore rules and threaded through name and email indices, merging into the
//! identity it belongs to as soon as shared information appears.
//!
//! # Architecture
//!
//! - **filter**: Email significance classification against ignore patterns
//! - **domain**: Contact records and the pairwise merge operator
//! - **resolution**: Name/email indices and the orphan-email set
//! - **engine**: Pass orchestration and the final report
//! - **models**: Raw feed records and pages
//! - **repositories**: Paginated feed abstraction and a JSON file feed
//! - **services**: Async pass driver over a feed
//! - **config**: Configuration from environment variables
//! - **error**: Custom error types for precise error handling

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod repositories;
pub mod resolution;
pub mod services;

pub use config::{Config, IgnoreRules};
pub use domain::{ContactRecord, MergeAudit};
pub use engine::{DedupEngine, DedupReport, IngestStatus, PassStats, ReportSummary};
pub use error::{ConfigError, DedupError, FeedError};
pub use filter::{Classification, EmailFilter};
pub use models::{FeedPage, RawContact, RawEmail};
pub use repositories::{ContactFeed, JsonFileFeed};
pub use resolution::{IngestOutcome, RecordId, ResolutionIndex};
pub use services::{DedupService, DedupServiceImpl};
