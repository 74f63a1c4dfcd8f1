//! Data models for the contacts feed.
//!
//! This module contains the raw records and pages delivered by the paginated
//! contacts source, before any filtering or normalization.

pub mod contact;

pub use contact::{FeedPage, RawContact, RawEmail};
