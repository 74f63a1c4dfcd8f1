//! Test doubles shared by integration tests.

mod mock_contact_feed;

pub use mock_contact_feed::MockContactFeed;
