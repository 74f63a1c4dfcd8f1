//! Email filtering.
//!
//! Classifies addresses that are structurally noise (auto-replies, marketplace
//! and social relays) so they never take part in identity resolution.

mod email_filter;

pub use email_filter::{Classification, EmailFilter};
