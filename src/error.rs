//! Error types for the contact deduplication engine.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// No ignore patterns were configured
    #[error("Email ignore rules are empty; refusing to process unfiltered input")]
    EmptyIgnoreRules,

    /// An ignore pattern failed to compile
    #[error("Invalid ignore pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Failed to read a pattern file
    #[error("Failed to read pattern file {path}: {reason}")]
    PatternFile { path: String, reason: String },
}

/// Errors raised by the paginated contact feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Reading the feed source failed
    #[error("Feed I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a feed payload
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The upstream contacts service reported a failure
    #[error("Upstream feed error: {0}")]
    Upstream(String),
}

/// Errors that abort a deduplication pass.
#[derive(Error, Debug)]
pub enum DedupError {
    /// The pass could not start because configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A page fetch failed; no partial result is reported
    #[error("Feed failed at start index {start_index}: {source}")]
    Feed {
        start_index: usize,
        #[source]
        source: FeedError,
    },
}

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with FeedError
pub type FeedResult<T> = Result<T, FeedError>;

/// Convenience type alias for Results with DedupError
pub type DedupResult<T> = Result<T, DedupError>;
