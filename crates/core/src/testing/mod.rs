//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the provider, transcoder
//! and scratch space seams, allowing end-to-end tests of search and
//! download without yt-dlp, ffmpeg or a scratch directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fastmusic_core::testing::{MemoryScratchSpace, MockDownload, MockProvider, MockTranscoder};
//!
//! let scratch = Arc::new(MemoryScratchSpace::new());
//! let provider = MockProvider::with_scratch(scratch.clone());
//!
//! // Strategy 1 fails, strategy 2 writes an mp3
//! provider.push_download(MockDownload::fail_download("HTTP Error 403"));
//! provider.push_download(MockDownload::produce("Song", "mp3"));
//! ```

mod memory_scratch;
mod mock_provider;
mod mock_transcoder;

pub use memory_scratch::MemoryScratchSpace;
pub use mock_provider::{MockDownload, MockProvider};
pub use mock_transcoder::MockTranscoder;

/// Test fixtures and helper functions.
pub mod fixtures {
    use base64::Engine;

    use crate::provider::SearchEntry;

    /// Standard base64 of `url`, as a client would send it.
    pub fn encode_url(url: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(url)
    }

    /// A complete search entry.
    pub fn search_entry(id: &str, title: &str, duration_secs: f64) -> SearchEntry {
        SearchEntry {
            id: Some(id.to_string()),
            title: Some(title.to_string()),
            uploader: Some("Mock Channel".to_string()),
            channel: None,
            duration: Some(duration_secs),
        }
    }
}
