//! ContactRecord: one raw record after email filtering.

use crate::filter::{Classification, EmailFilter};
use crate::models::RawContact;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// The normalized, in-memory form of one input record.
///
/// Invariant: `primary_email`, when set, is a member of `emails`. All mutation
/// goes through [`ContactRecord::add_email`] or the merge operator, which both
/// preserve it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    pub(super) full_name: Option<String>,
    pub(super) primary_email: Option<String>,
    pub(super) emails: BTreeSet<String>,
    pub(super) phone_numbers: BTreeSet<String>,
    pub(super) had_ignored_emails: bool,
}

impl ContactRecord {
    /// Create an empty record with an optional name.
    pub fn new(full_name: Option<String>) -> Self {
        Self {
            full_name,
            ..Default::default()
        }
    }

    /// Build a record from a raw feed entry, dropping ignored addresses.
    ///
    /// When several significant addresses are marked primary, the last one wins.
    pub fn from_raw(raw: &RawContact, filter: &EmailFilter) -> Self {
        let mut record = Self::new(raw.name.clone());

        for email in &raw.emails {
            match filter.classify(&email.address) {
                Classification::Ignored => record.had_ignored_emails = true,
                Classification::Significant => {
                    record.add_email(email.address.clone(), email.primary)
                }
            }
        }

        record.phone_numbers.extend(raw.phones.iter().cloned());
        record
    }

    /// Add a significant address, optionally making it primary.
    pub fn add_email(&mut self, address: String, primary: bool) {
        if primary {
            self.primary_email = Some(address.clone());
        }
        self.emails.insert(address);
    }

    /// Add a phone number.
    pub fn add_phone(&mut self, phone: String) {
        self.phone_numbers.insert(phone);
    }

    /// Full name with original casing.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Lowercased name used as the `by_name` key.
    pub fn name_key(&self) -> Option<String> {
        self.full_name.as_ref().map(|name| name.to_lowercase())
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.primary_email.as_deref()
    }

    pub fn emails(&self) -> &BTreeSet<String> {
        &self.emails
    }

    pub fn phone_numbers(&self) -> &BTreeSet<String> {
        &self.phone_numbers
    }

    pub fn had_ignored_emails(&self) -> bool {
        self.had_ignored_emails
    }

    /// Has a name but no significant email.
    pub fn is_name_only(&self) -> bool {
        self.full_name.is_some() && self.emails.is_empty()
    }

    /// Every source email was ignored; such records are never indexed.
    pub fn is_droppable(&self) -> bool {
        self.had_ignored_emails && self.emails.is_empty()
    }
}

/// Renders a `[a, b]` list.
struct SetDisplay<'a>(&'a BTreeSet<String>);

impl fmt::Display for SetDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

/// Trace form: `<name or [no name]> [<primary>], [emails], [phones]`.
impl fmt::Display for ContactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}], {}, {}",
            self.full_name.as_deref().unwrap_or("[no name]"),
            self.primary_email.as_deref().unwrap_or(""),
            SetDisplay(&self.emails),
            SetDisplay(&self.phone_numbers)
        )
    }
}
