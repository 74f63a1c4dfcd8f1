//! Results of a completed deduplication pass.

use crate::domain::{ContactRecord, MergeAudit};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Counters collected while records are ingested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Raw records consumed from the feed
    pub records_read: usize,

    /// Records discarded because every email was ignored
    pub records_dropped: usize,

    /// Records that carried at least one ignored email
    pub records_with_ignored_emails: usize,

    /// Records absorbed into an existing record by name
    pub name_merges: usize,

    /// Records absorbed into at least one existing record by email
    pub email_merges: usize,
}

/// Final output of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DedupReport {
    /// Title of the feed owner, when the feed reports one
    pub owner: Option<String>,

    /// Deduplicated contacts with at least one email, keyed by lowercase name
    pub contacts: BTreeMap<String, ContactRecord>,

    /// Addresses never claimed by a named record, sorted
    pub orphan_emails: Vec<String>,

    /// Names that never acquired an email, sorted
    pub name_only: Vec<String>,

    /// Names absorbed into other records
    pub merge_audit: MergeAudit,

    /// Ingestion counters
    pub stats: PassStats,

    /// Distinct significant addresses seen
    pub unique_emails: usize,

    pub completed_at: DateTime<Utc>,
}

impl DedupReport {
    /// Merged contact by case-insensitive name.
    pub fn contact(&self, name: &str) -> Option<&ContactRecord> {
        self.contacts.get(&name.to_lowercase())
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            owner: self.owner.clone(),
            records_read: self.stats.records_read,
            records_dropped: self.stats.records_dropped,
            unique_emails: self.unique_emails,
            orphan_emails: self.orphan_emails.len(),
            name_only: self.name_only.len(),
            contacts: self.contacts.len(),
            merge_count: self.merge_audit.merge_count(),
        }
    }
}

/// Headline counts of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub owner: Option<String>,
    pub records_read: usize,
    pub records_dropped: usize,
    pub unique_emails: usize,
    pub orphan_emails: usize,
    pub name_only: usize,
    pub contacts: usize,
    pub merge_count: usize,
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}]: total contacts read: {}",
            self.owner.as_deref().unwrap_or("[contacts owner]"),
            self.records_read
        )?;
        writeln!(f, "dropped (all emails ignored): {}", self.records_dropped)?;
        writeln!(f, "unique emails: {}", self.unique_emails)?;
        writeln!(f, "emails with no names: {}", self.orphan_emails)?;
        writeln!(f, "just names w/out emails: {}", self.name_only)?;
        writeln!(f, "contacts with full name and emails: {}", self.contacts)?;
        write!(f, "merged: {}", self.merge_count)
    }
}
