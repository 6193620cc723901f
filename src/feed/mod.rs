//! Feed retrieval and parsing.
//!
//! - [`fetcher`] - one outbound GET per request via `reqwest`
//! - [`parser`] - RSS/Atom/JSON Feed parsing via `feed-rs`, reshaped into [`FeedDocument`]

mod fetcher;
mod parser;

pub use fetcher::{FeedFetcher, FetchError};
pub use parser::{parse_feed, FeedDocument, FeedItem, FeedLink, FeedMedia, FeedPerson};
pub use feed_rs::parser::ParseFeedError;
