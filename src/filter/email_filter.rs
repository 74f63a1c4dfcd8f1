//! Email significance classification against configured ignore patterns.
//!
//! All fragments are compiled into a single [`RegexSet`] so an address is
//! classified in one pass regardless of how many rules are configured.

use crate::config::IgnoreRules;
use crate::error::{ConfigError, ConfigResult};
use regex::{Regex, RegexSet};
use std::fmt;

/// Outcome of classifying one email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The address takes part in identity resolution.
    Significant,
    /// The address matched an ignore pattern and is dropped.
    Ignored,
}

/// Classifies email addresses as significant or ignorable.
///
/// A filter can only be built from a non-empty [`IgnoreRules`]; there is no
/// pass-through mode. Each fragment must match the whole address.
///
/// # Example
///
/// ```
/// use contact_dedup::config::IgnoreRules;
/// use contact_dedup::filter::{Classification, EmailFilter};
///
/// let filter = EmailFilter::new(&IgnoreRules::new([".*auto_reply.*"])).unwrap();
/// assert_eq!(filter.classify("vasya@pupkin.com"), Classification::Significant);
/// assert_eq!(filter.classify("auto_reply-2134@pupkin.com"), Classification::Ignored);
/// ```
#[derive(Clone)]
pub struct EmailFilter {
    regex_set: RegexSet,
    patterns: Vec<String>,
}

impl EmailFilter {
    /// Compile the configured rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyIgnoreRules` when no fragments are configured
    /// and `ConfigError::InvalidPattern` naming the first fragment that fails
    /// to compile.
    pub fn new(rules: &IgnoreRules) -> ConfigResult<Self> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyIgnoreRules);
        }

        let mut anchored = Vec::with_capacity(rules.patterns.len());
        for pattern in &rules.patterns {
            let full = Self::anchor(pattern, rules.case_insensitive);
            Regex::new(&full).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            anchored.push(full);
        }

        let regex_set = RegexSet::new(&anchored).map_err(|e| ConfigError::InvalidPattern {
            pattern: rules.patterns.join("|"),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            pattern_count = rules.patterns.len(),
            case_insensitive = rules.case_insensitive,
            "Email filter compiled"
        );

        Ok(Self {
            regex_set,
            patterns: rules.patterns.clone(),
        })
    }

    fn anchor(pattern: &str, case_insensitive: bool) -> String {
        if case_insensitive {
            format!("(?i)^(?:{})$", pattern)
        } else {
            format!("^(?:{})$", pattern)
        }
    }

    /// Classify a single address.
    pub fn classify(&self, address: &str) -> Classification {
        if self.regex_set.is_match(address) {
            tracing::trace!(address = %address, "Email ignored");
            Classification::Ignored
        } else {
            Classification::Significant
        }
    }

    /// Shorthand for `classify(address) == Classification::Ignored`.
    pub fn is_ignored(&self, address: &str) -> bool {
        self.classify(address) == Classification::Ignored
    }

    /// Indices of the configured fragments that match the address.
    pub fn matching_patterns(&self, address: &str) -> Vec<usize> {
        self.regex_set.matches(address).into_iter().collect()
    }

    /// The configured fragment at `index`.
    pub fn pattern(&self, index: usize) -> Option<&str> {
        self.patterns.get(index).map(String::as_str)
    }

    /// Number of configured fragments.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl fmt::Debug for EmailFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailFilter")
            .field("patterns", &self.patterns)
            .finish()
    }
}
