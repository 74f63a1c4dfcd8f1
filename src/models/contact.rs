//! Raw contact records as delivered by the paginated contacts feed.

use serde::{Deserialize, Deserializer, Serialize};

/// One email address on a raw record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RawEmail {
    /// The address, verbatim from the source
    pub address: String,

    /// Whether the source marked this address as primary
    #[serde(default)]
    pub primary: bool,
}

impl RawEmail {
    /// A non-primary address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            primary: false,
        }
    }

    /// An address marked primary by the source.
    pub fn primary(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            primary: true,
        }
    }
}

/// Email entry as it may appear in a feed payload: a bare string or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmailEntry {
    Plain(String),
    Detailed {
        #[serde(alias = "email")]
        address: String,
        #[serde(default)]
        primary: bool,
    },
}

/// Custom deserializer accepting both `"a@b.com"` and `{"address": "a@b.com", "primary": true}`
fn deserialize_emails<'de, D>(deserializer: D) -> Result<Vec<RawEmail>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<EmailEntry> = Vec::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            EmailEntry::Plain(address) => RawEmail::new(address),
            EmailEntry::Detailed { address, primary } => RawEmail { address, primary },
        })
        .collect())
}

/// A contact record before filtering and normalization.
///
/// `name` is `None` only when the source carried no name at all; an empty or
/// whitespace-only name is still a name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RawContact {
    /// Display name (full name)
    #[serde(alias = "full_name")]
    pub name: Option<String>,

    /// Email addresses in source order
    #[serde(deserialize_with = "deserialize_emails")]
    pub emails: Vec<RawEmail>,

    /// Phone numbers, verbatim
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<String>,
}

impl RawContact {
    /// Create a record with an optional name and no emails.
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    /// Append an address; the first address added is marked primary, like the
    /// contacts service does for single-address entries.
    pub fn with_email(mut self, address: impl Into<String>) -> Self {
        let primary = self.emails.is_empty();
        self.emails.push(RawEmail {
            address: address.into(),
            primary,
        });
        self
    }

    /// Append an address with an explicit primary flag.
    pub fn with_raw_email(mut self, email: RawEmail) -> Self {
        self.emails.push(email);
        self
    }

    /// Append a phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phones.push(phone.into());
        self
    }
}

/// One page of the contacts feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct FeedPage {
    /// Title of the feed owner, if the source reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Records on this page, in delivery order
    pub entries: Vec<RawContact>,
}

impl FeedPage {
    /// A page with no owner title.
    pub fn new(entries: Vec<RawContact>) -> Self {
        Self {
            owner: None,
            entries,
        }
    }

    /// Whether this page ends the feed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
