mod json_file_feed;
mod traits;

pub use json_file_feed::JsonFileFeed;
pub use traits::ContactFeed;
