//! Configuration management for the contact deduplication engine.
//!
//! This module handles loading and validating configuration from environment variables.
//! The ignore rules are required: a pass never runs with unfiltered input.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Separator for inline patterns in `DEDUP_IGNORE_PATTERNS`.
pub const INLINE_PATTERN_SEPARATOR: char = ';';

/// Default number of records requested per feed page.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// The configured set of email ignore patterns.
///
/// Each pattern is a regex fragment that must match a whole address. Patterns
/// are joined with logical OR by [`crate::filter::EmailFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    /// Ordered regex fragments
    pub patterns: Vec<String>,

    /// Apply case-insensitive matching to every fragment
    pub case_insensitive: bool,
}

impl IgnoreRules {
    /// Create rules from a list of fragments, case-sensitive.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    /// Enable or disable case-insensitive matching for all fragments.
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Parse the `;`-separated inline form.
    pub fn parse_inline(value: &str) -> Vec<String> {
        value
            .split(INLINE_PATTERN_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Parse a pattern file body: one fragment per line, `#` starts a comment line.
    pub fn parse_lines(body: &str) -> Vec<String> {
        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }

    /// Load fragments from a pattern file.
    pub fn load_file(path: &Path) -> ConfigResult<Vec<String>> {
        let body = std::fs::read_to_string(path).map_err(|e| ConfigError::PatternFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::parse_lines(&body))
    }

    /// Whether no fragments are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Configuration for a deduplication run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Email ignore rules (required, non-empty)
    pub ignore_rules: IgnoreRules,

    /// Records requested per feed page (default: 5000)
    pub page_size: usize,

    /// Path of the JSON feed file, if given
    pub input_path: Option<PathBuf>,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// At least one pattern source is required:
    /// - `DEDUP_IGNORE_PATTERNS`: `;`-separated regex fragments
    /// - `DEDUP_IGNORE_PATTERNS_FILE`: file with one fragment per line
    ///
    /// Optional environment variables:
    /// - `DEDUP_IGNORE_CASE_INSENSITIVE`: `true`/`false` (default: false)
    /// - `DEDUP_PAGE_SIZE`: records per feed page (default: 5000)
    /// - `DEDUP_INPUT`: path to the JSON feed file
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // .env is optional and must not print anything
        let _ = dotenvy::dotenv();

        let inline = env::var("DEDUP_IGNORE_PATTERNS").ok();
        let file = env::var("DEDUP_IGNORE_PATTERNS_FILE").ok();

        if inline.is_none() && file.is_none() {
            return Err(ConfigError::MissingVar("DEDUP_IGNORE_PATTERNS".to_string()));
        }

        let mut patterns = inline
            .as_deref()
            .map(IgnoreRules::parse_inline)
            .unwrap_or_default();
        if let Some(path) = file {
            patterns.extend(IgnoreRules::load_file(Path::new(&path))?);
        }

        if patterns.is_empty() {
            return Err(ConfigError::EmptyIgnoreRules);
        }

        let case_insensitive = Self::parse_env_bool("DEDUP_IGNORE_CASE_INSENSITIVE", false)?;
        let page_size = Self::parse_env_usize("DEDUP_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                var: "DEDUP_PAGE_SIZE".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let input_path = env::var("DEDUP_INPUT").ok().map(PathBuf::from);
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            ignore_rules: IgnoreRules::new(patterns).with_case_insensitive(case_insensitive),
            page_size,
            input_path,
            log_level,
        })
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as bool with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}
