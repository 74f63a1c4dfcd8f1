//! Name and email indices over an arena of contact records.

use crate::domain::{absorb, ContactRecord, MergeAudit};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Handle of a record stored in a [`ResolutionIndex`].
///
/// Both indices hold handles rather than records, so a merge made through one
/// index is visible through the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl RecordId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to one record during ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Existing record that absorbed the incoming one by name
    pub merged_by_name: Option<RecordId>,

    /// Existing records that absorbed the incoming one by email, one per shared address
    pub merged_by_email: Vec<RecordId>,

    /// Slot holding the incoming record, when some index now references it
    pub stored: Option<RecordId>,
}

impl IngestOutcome {
    pub fn is_merged_by_email(&self) -> bool {
        !self.merged_by_email.is_empty()
    }
}

/// Mapping tables threading each incoming record to the identity it belongs to.
///
/// - `by_name`: lowercase name to record, at most one per name
/// - `by_email`: address to record, many addresses may share one record
/// - `orphan_emails`: addresses seen only on unnamed records
///
/// A name match and an email match may resolve to two different existing
/// records; each absorbs the incoming record independently and the two are
/// not reconciled.
#[derive(Debug, Default)]
pub struct ResolutionIndex {
    records: Vec<ContactRecord>,
    by_name: HashMap<String, RecordId>,
    by_email: HashMap<String, RecordId>,
    orphan_emails: BTreeSet<String>,
}

impl ResolutionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread one non-droppable record through both indices.
    ///
    /// A named incoming record that changes any existing record is audited
    /// once, however many name and email matches absorbed it.
    pub fn ingest(&mut self, incoming: ContactRecord, audit: &mut MergeAudit) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();
        let mut changed = false;

        match incoming.name_key() {
            Some(key) => {
                let existing = self.by_name.get(&key).copied();
                match existing {
                    Some(id) => {
                        changed |= absorb(&mut self.records[id.0], &incoming);
                        outcome.merged_by_name = Some(id);
                    }
                    None => {
                        let id = self.store(&incoming, &mut outcome.stored);
                        self.by_name.insert(key, id);
                    }
                }
                // the name now claims these addresses
                for email in incoming.emails() {
                    self.orphan_emails.remove(email);
                }
            }
            None => {
                self.orphan_emails
                    .extend(incoming.emails().iter().cloned());
            }
        }

        for email in incoming.emails() {
            let existing = self.by_email.get(email).copied();
            match existing {
                Some(id) => {
                    changed |= absorb(&mut self.records[id.0], &incoming);
                    outcome.merged_by_email.push(id);
                }
                None => {
                    let id = self.store(&incoming, &mut outcome.stored);
                    self.by_email.insert(email.clone(), id);
                }
            }
        }

        if outcome.is_merged_by_email() {
            for email in incoming.emails() {
                self.orphan_emails.remove(email);
            }
            tracing::debug!(
                record = %incoming,
                targets = outcome.merged_by_email.len(),
                "Merged by email, addresses no longer orphaned"
            );
        }

        if changed {
            if let Some(name) = incoming.full_name() {
                audit.record(name);
            }
        }

        outcome
    }

    /// Store the incoming record at most once per ingestion.
    fn store(&mut self, incoming: &ContactRecord, slot: &mut Option<RecordId>) -> RecordId {
        if let Some(id) = *slot {
            return id;
        }
        let id = RecordId(self.records.len());
        self.records.push(incoming.clone());
        *slot = Some(id);
        id
    }

    /// Remove name-only records from `by_name`, returning their names sorted.
    pub fn prune_name_only(&mut self) -> Vec<String> {
        let records = &self.records;
        let mut pruned = Vec::new();

        self.by_name.retain(|_, id| {
            let record = &records[id.0];
            if record.emails().is_empty() {
                if let Some(name) = record.full_name() {
                    pruned.push(name.to_string());
                }
                false
            } else {
                true
            }
        });

        pruned.sort();
        pruned
    }

    /// Named record by case-insensitive name.
    pub fn get_by_name(&self, name: &str) -> Option<&ContactRecord> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|id| &self.records[id.0])
    }

    /// Record currently owning an address.
    pub fn get_by_email(&self, email: &str) -> Option<&ContactRecord> {
        self.by_email.get(email).map(|id| &self.records[id.0])
    }

    pub fn name_id(&self, name: &str) -> Option<RecordId> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn email_id(&self, email: &str) -> Option<RecordId> {
        self.by_email.get(email).copied()
    }

    /// Named records keyed by lowercase name, sorted.
    pub fn named(&self) -> BTreeMap<&str, &ContactRecord> {
        self.by_name
            .iter()
            .map(|(key, id)| (key.as_str(), &self.records[id.0]))
            .collect()
    }

    pub fn orphan_emails(&self) -> &BTreeSet<String> {
        &self.orphan_emails
    }

    pub fn is_orphan(&self, email: &str) -> bool {
        self.orphan_emails.contains(email)
    }

    /// Number of distinct names indexed.
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    /// Number of distinct significant addresses seen.
    pub fn unique_email_count(&self) -> usize {
        self.by_email.len()
    }

    /// Number of records ever stored, including ones reachable only by email.
    pub fn stored_count(&self) -> usize {
        self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.by_name.clear();
        self.by_email.clear();
        self.orphan_emails.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: Option<&str>, emails: &[&str]) -> ContactRecord {
        let mut record = ContactRecord::new(name.map(str::to_string));
        for (i, email) in emails.iter().enumerate() {
            record.add_email(email.to_string(), i == 0);
        }
        record
    }

    #[test]
    fn test_new_named_record_is_indexed_both_ways() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        let outcome = index.ingest(record(Some("Ann Lee"), &["ann@x.com"]), &mut audit);

        assert_eq!(outcome.merged_by_name, None);
        assert!(!outcome.is_merged_by_email());
        let id = outcome.stored.unwrap();
        assert_eq!(index.name_id("ann lee"), Some(id));
        assert_eq!(index.email_id("ann@x.com"), Some(id));
        assert!(index.orphan_emails().is_empty());
    }

    #[test]
    fn test_case_insensitive_name_merge() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(Some("Vasya Pupkin"), &["vasya@pupkin.com"]), &mut audit);
        let outcome = index.ingest(record(Some("vasya pupkin"), &["head@pupkin.com"]), &mut audit);

        assert!(outcome.merged_by_name.is_some());
        assert_eq!(index.name_count(), 1);
        let merged = index.get_by_name("VASYA PUPKIN").unwrap();
        assert_eq!(merged.full_name(), Some("Vasya Pupkin"));
        assert_eq!(merged.emails().len(), 2);
    }

    #[test]
    fn test_unnamed_emails_become_orphans() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        let outcome = index.ingest(record(None, &["lost@x.com"]), &mut audit);

        assert!(index.is_orphan("lost@x.com"));
        assert_eq!(index.email_id("lost@x.com"), outcome.stored);
        assert_eq!(index.name_count(), 0);
    }

    #[test]
    fn test_named_record_claims_orphans() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(None, &["vasya@pupkin.com"]), &mut audit);
        let outcome = index.ingest(
            record(Some("vasya pupkin"), &["vasya@pupkin.com", "head@pupkin.com"]),
            &mut audit,
        );

        assert!(outcome.is_merged_by_email());
        assert!(index.orphan_emails().is_empty());
        let by_email = index.get_by_email("vasya@pupkin.com").unwrap();
        assert_eq!(by_email.full_name(), Some("vasya pupkin"));
        assert_eq!(by_email.emails().len(), 2);
        assert_eq!(audit.merge_count(), 1);
    }

    #[test]
    fn test_email_merge_claims_orphans_without_name() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(Some("Ann"), &["ann@x.com"]), &mut audit);
        index.ingest(record(None, &["ann@x.com", "ann.alt@x.com"]), &mut audit);

        assert!(!index.is_orphan("ann.alt@x.com"));
        let ann = index.get_by_name("ann").unwrap();
        assert!(ann.emails().contains("ann.alt@x.com"));
        // the unseen address was mapped to the incoming record itself
        assert_ne!(index.email_id("ann.alt@x.com"), index.name_id("ann"));
    }

    #[test]
    fn test_name_and_email_matches_are_not_reconciled() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        let first = index.ingest(record(Some("Ann"), &["ann@x.com"]), &mut audit);
        let second = index.ingest(record(Some("Bob"), &["bob@x.com"]), &mut audit);
        let outcome = index.ingest(record(Some("Ann"), &["bob@x.com"]), &mut audit);

        assert_eq!(outcome.merged_by_name, first.stored);
        assert_eq!(outcome.merged_by_email, vec![second.stored.unwrap()]);
        assert_eq!(index.name_count(), 2);
        assert!(index.get_by_name("ann").unwrap().emails().contains("bob@x.com"));
        assert_eq!(index.get_by_name("bob").unwrap().full_name(), Some("Bob"));
        assert_eq!(index.email_id("bob@x.com"), second.stored);
    }

    #[test]
    fn test_merged_record_is_not_stored() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(Some("Ann"), &["ann@x.com"]), &mut audit);
        let outcome = index.ingest(record(Some("ann"), &["ann@x.com"]), &mut audit);

        assert_eq!(outcome.stored, None);
        assert_eq!(index.stored_count(), 1);
    }

    #[test]
    fn test_prune_name_only() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(Some("Zed"), &[]), &mut audit);
        index.ingest(record(Some("Amy"), &[]), &mut audit);
        index.ingest(record(Some("Bob"), &["bob@x.com"]), &mut audit);

        let pruned = index.prune_name_only();
        assert_eq!(pruned, vec!["Amy", "Zed"]);
        assert_eq!(index.name_count(), 1);
        assert!(index.get_by_name("bob").is_some());
    }

    #[test]
    fn test_name_only_rescued_by_later_email() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(Some("Amy"), &[]), &mut audit);
        index.ingest(record(Some("amy"), &["amy@x.com"]), &mut audit);

        assert!(index.prune_name_only().is_empty());
        assert_eq!(index.named().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();
        index.ingest(record(None, &["a@x.com"]), &mut audit);

        index.clear();
        assert_eq!(index.stored_count(), 0);
        assert!(index.orphan_emails().is_empty());
        assert_eq!(index.unique_email_count(), 0);
    }

    #[test]
    fn test_duplicate_name_and_email_audited_once() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(Some("Ann"), &["ann@x.com"]), &mut audit);
        let outcome = index.ingest(record(Some("ann"), &["ann@x.com"]), &mut audit);

        assert!(outcome.merged_by_name.is_some());
        assert!(outcome.is_merged_by_email());
        assert_eq!(audit.merge_count(), 1);
        assert_eq!(audit.merged_names().len(), 1);
    }

    #[test]
    fn test_several_shared_emails_audited_once() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(None, &["a@x.com", "b@x.com"]), &mut audit);
        let outcome = index.ingest(record(Some("Vasya"), &["a@x.com", "b@x.com"]), &mut audit);

        assert_eq!(outcome.merged_by_email.len(), 2);
        assert_eq!(audit.merge_count(), 1);
        assert!(audit.merged_names().contains("Vasya"));
    }

    #[test]
    fn test_unnamed_absorption_not_audited() {
        let mut index = ResolutionIndex::new();
        let mut audit = MergeAudit::new();

        index.ingest(record(Some("Ann"), &["ann@x.com"]), &mut audit);
        index.ingest(record(None, &["ann@x.com", "ann2@x.com"]), &mut audit);

        assert_eq!(audit.merge_count(), 0);
    }
}
