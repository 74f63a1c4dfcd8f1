//! Pairwise merge of contact records and the audit trail it feeds.

use super::ContactRecord;
use serde::Serialize;
use std::collections::BTreeSet;

/// Names absorbed into other records during one ingestion pass.
///
/// Owned by a single engine instance; a new pass starts from a fresh audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeAudit {
    merged_names: BTreeSet<String>,
    merge_count: usize,
}

impl MergeAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one absorbed named record.
    pub fn record(&mut self, name: &str) {
        self.merge_count += 1;
        self.merged_names.insert(name.to_string());
    }

    /// Number of absorbed records, including repeats of the same name.
    pub fn merge_count(&self) -> usize {
        self.merge_count
    }

    /// Distinct absorbed names, sorted.
    pub fn merged_names(&self) -> &BTreeSet<String> {
        &self.merged_names
    }

    pub fn reset(&mut self) {
        self.merged_names.clear();
        self.merge_count = 0;
    }
}

/// Absorb `incoming` into `target`, returning whether the name or emails changed.
///
/// - A missing target name is filled from `incoming`.
/// - Non-empty incoming emails are unioned in; the target keeps its own primary
///   and only adopts the incoming one when it has none.
/// - Phones are always unioned but never count as a change.
///
/// Nothing is audited here; see [`merge_into`].
pub fn absorb(target: &mut ContactRecord, incoming: &ContactRecord) -> bool {
    let mut changed = false;

    if target.full_name.is_none() && incoming.full_name.is_some() {
        target.full_name = incoming.full_name.clone();
        changed = true;
    }

    if !incoming.emails.is_empty() {
        target.emails.extend(incoming.emails.iter().cloned());
        if target.primary_email.is_none() {
            target.primary_email = incoming.primary_email.clone();
        }
        changed = true;
    }

    target
        .phone_numbers
        .extend(incoming.phone_numbers.iter().cloned());

    tracing::debug!(
        target_record = %target,
        incoming_record = %incoming,
        changed,
        "Merged contact records"
    );

    changed
}

/// [`absorb`] followed by an audit entry when a named incoming record changed
/// the target.
pub fn merge_into(target: &mut ContactRecord, incoming: &ContactRecord, audit: &mut MergeAudit) -> bool {
    let changed = absorb(target, incoming);
    if changed {
        if let Some(name) = incoming.full_name.as_deref() {
            audit.record(name);
        }
    }
    changed
}
