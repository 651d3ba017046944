//! Keyword search over the video platform.

mod service;
mod types;

pub use service::{SearchService, SEARCH_LIMIT};
pub use types::{SearchQuery, SearchResult, UNKNOWN_CHANNEL, UNKNOWN_TITLE};
