//! Incremental identity resolution.
//!
//! [`ResolutionIndex`] keeps one live record per lowercase name and per email
//! address, plus the set of addresses no name has claimed yet.

mod index;

pub use index::{IngestOutcome, RecordId, ResolutionIndex};
