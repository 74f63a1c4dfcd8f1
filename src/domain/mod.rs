//! Domain types for identity resolution.
//!
//! [`ContactRecord`] is the filtered form of one raw record; [`merge_into`]
//! combines two of them and reports absorbed names to a [`MergeAudit`].

pub mod contact_record;
pub mod merge;

pub use contact_record::ContactRecord;
pub use merge::{absorb, merge_into, MergeAudit};
