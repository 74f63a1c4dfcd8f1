//! Single-pass deduplication over an ordered stream of raw records.

use super::report::{DedupReport, PassStats};
use crate::domain::{ContactRecord, MergeAudit};
use crate::filter::EmailFilter;
use crate::models::RawContact;
use crate::resolution::{IngestOutcome, ResolutionIndex};
use tracing::{debug, info, trace, warn};

/// What the engine did with one raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestStatus {
    /// Every email was ignored; the record was not indexed.
    Dropped,
    /// The record went through the resolution index.
    Indexed(IngestOutcome),
}

/// Drives filtering, record construction and the resolution index for one pass.
///
/// The engine is synchronous and owns all pass state, including the merge
/// audit. Feed records strictly in delivery order; construct a new engine
/// (or call [`DedupEngine::reset`]) before starting another pass.
///
/// # Example
///
/// ```
/// use contact_dedup::config::IgnoreRules;
/// use contact_dedup::engine::DedupEngine;
/// use contact_dedup::filter::EmailFilter;
/// use contact_dedup::models::RawContact;
///
/// let filter = EmailFilter::new(&IgnoreRules::new([".*auto_reply.*"])).unwrap();
/// let mut engine = DedupEngine::new(filter);
/// engine.ingest(&RawContact::new(Some("Vasya Pupkin")).with_email("vasya@pupkin.com"));
/// engine.ingest(&RawContact::new(Some("vasya pupkin")).with_email("head@pupkin.com"));
///
/// let report = engine.finish();
/// assert_eq!(report.contacts.len(), 1);
/// assert_eq!(report.contact("Vasya Pupkin").unwrap().emails().len(), 2);
/// ```
#[derive(Debug)]
pub struct DedupEngine {
    filter: EmailFilter,
    index: ResolutionIndex,
    audit: MergeAudit,
    stats: PassStats,
    owner: Option<String>,
}

impl DedupEngine {
    /// Create an engine for one pass. The filter is required, so an engine
    /// cannot exist without configured ignore rules.
    pub fn new(filter: EmailFilter) -> Self {
        Self {
            filter,
            index: ResolutionIndex::new(),
            audit: MergeAudit::new(),
            stats: PassStats::default(),
            owner: None,
        }
    }

    /// Ingest one raw record.
    pub fn ingest(&mut self, raw: &RawContact) -> IngestStatus {
        let record = ContactRecord::from_raw(raw, &self.filter);
        self.stats.records_read += 1;
        trace!(n = self.stats.records_read, record = %record, "Read contact");

        if record.had_ignored_emails() {
            self.stats.records_with_ignored_emails += 1;
        }

        if record.is_droppable() {
            self.stats.records_dropped += 1;
            warn!(record = %record, "All emails ignored, dropping record");
            return IngestStatus::Dropped;
        }

        let outcome = self.index.ingest(record, &mut self.audit);
        if outcome.merged_by_name.is_some() {
            self.stats.name_merges += 1;
        }
        if outcome.is_merged_by_email() {
            self.stats.email_merges += 1;
        }

        IngestStatus::Indexed(outcome)
    }

    /// Ingest every record of a page, in order.
    pub fn ingest_all<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a RawContact>,
    {
        for raw in records {
            self.ingest(raw);
        }
    }

    /// Remember the feed owner title for the report.
    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = Some(owner.into());
    }

    /// Index state so far, for inspection mid-pass.
    pub fn index(&self) -> &ResolutionIndex {
        &self.index
    }

    pub fn audit(&self) -> &MergeAudit {
        &self.audit
    }

    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    pub fn filter(&self) -> &EmailFilter {
        &self.filter
    }

    /// Discard all pass state, keeping the filter.
    pub fn reset(&mut self) {
        self.index.clear();
        self.audit.reset();
        self.stats = PassStats::default();
        self.owner = None;
        debug!("Dedup engine reset");
    }

    /// Complete the pass: prune name-only records and produce the report.
    pub fn finish(mut self) -> DedupReport {
        let name_only = self.index.prune_name_only();

        let contacts = self
            .index
            .named()
            .into_iter()
            .map(|(key, record)| (key.to_string(), record.clone()))
            .collect();

        let report = DedupReport {
            owner: self.owner,
            contacts,
            orphan_emails: self.index.orphan_emails().iter().cloned().collect(),
            name_only,
            merge_audit: self.audit,
            stats: self.stats,
            unique_emails: self.index.unique_email_count(),
            completed_at: chrono::Utc::now(),
        };

        info!(
            records_read = report.stats.records_read,
            contacts = report.contacts.len(),
            orphan_emails = report.orphan_emails.len(),
            name_only = report.name_only.len(),
            merges = report.merge_audit.merge_count(),
            "Deduplication pass complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IgnoreRules;

    fn engine() -> DedupEngine {
        let rules = IgnoreRules::new([".*auto_reply.*", "sale-.*@craigslist.org"]);
        DedupEngine::new(EmailFilter::new(&rules).unwrap())
    }

    #[test]
    fn test_empty_pass() {
        let report = engine().finish();
        assert!(report.contacts.is_empty());
        assert!(report.orphan_emails.is_empty());
        assert!(report.name_only.is_empty());
        assert_eq!(report.merge_audit.merge_count(), 0);
        assert_eq!(report.stats, PassStats::default());
    }

    #[test]
    fn test_droppable_record_not_indexed() {
        let mut engine = engine();
        let status = engine.ingest(&RawContact::new(None).with_email("sale-x@craigslist.org"));

        assert_eq!(status, IngestStatus::Dropped);
        assert_eq!(engine.index().stored_count(), 0);
        assert_eq!(engine.stats().records_dropped, 1);
        assert_eq!(engine.stats().records_with_ignored_emails, 1);

        let report = engine.finish();
        assert!(report.orphan_emails.is_empty());
    }

    #[test]
    fn test_name_only_reported_separately() {
        let mut engine = engine();
        engine.ingest(&RawContact::new(Some("Nobody Mailable")));
        engine.ingest(&RawContact::new(Some("Ann")).with_email("ann@x.com"));

        let report = engine.finish();
        assert_eq!(report.name_only, vec!["Nobody Mailable"]);
        assert_eq!(report.contacts.keys().collect::<Vec<_>>(), vec!["ann"]);
    }

    #[test]
    fn test_orphans_sorted_in_report() {
        let mut engine = engine();
        engine.ingest(&RawContact::new(None).with_email("zz@x.com"));
        engine.ingest(&RawContact::new(None).with_email("aa@x.com"));

        let report = engine.finish();
        assert_eq!(report.orphan_emails, vec!["aa@x.com", "zz@x.com"]);
        assert_eq!(report.unique_emails, 2);
    }

    #[test]
    fn test_stats_count_merges() {
        let mut engine = engine();
        engine.ingest(&RawContact::new(Some("Ann")).with_email("ann@x.com"));
        engine.ingest(&RawContact::new(Some("ann")).with_email("ann2@x.com"));
        engine.ingest(&RawContact::new(None).with_email("ann@x.com"));

        assert_eq!(engine.stats().records_read, 3);
        assert_eq!(engine.stats().name_merges, 1);
        assert_eq!(engine.stats().email_merges, 1);
    }

    #[test]
    fn test_reset_clears_audit() {
        let mut engine = engine();
        engine.set_owner("me");
        engine.ingest(&RawContact::new(None).with_email("a@x.com"));
        engine.ingest(&RawContact::new(Some("A")).with_email("a@x.com"));
        assert_eq!(engine.audit().merge_count(), 1);

        engine.reset();
        assert_eq!(engine.audit().merge_count(), 0);
        assert_eq!(engine.stats().records_read, 0);

        let report = engine.finish();
        assert!(report.owner.is_none());
        assert!(report.contacts.is_empty());
    }

    #[test]
    fn test_summary_display() {
        let mut engine = engine();
        engine.set_owner("owner@example.com");
        engine.ingest(&RawContact::new(Some("Ann")).with_email("ann@x.com"));

        let summary = engine.finish().summary();
        assert_eq!(summary.contacts, 1);
        let text = summary.to_string();
        assert!(text.starts_with("[owner@example.com]: total contacts read: 1"));
        assert!(text.ends_with("merged: 0"));
    }
}
