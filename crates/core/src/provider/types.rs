//! Types exchanged with an extraction provider.

use serde::{Deserialize, Serialize};

use crate::scratch::UniqueId;

/// Raw entry of a flat search, as reported by the provider.
///
/// Every field is optional; flat mode only returns what the listing page
/// already carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Audio extraction performed by the provider after download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcess {
    /// Target codec (e.g. "mp3").
    pub codec: String,
    pub bitrate_kbps: u32,
}

/// Provider options for one download attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOptions {
    /// Format selector (e.g. "bestaudio/best").
    pub format: String,
    pub embed_metadata: bool,
    pub socket_timeout_secs: u64,
    pub retries: u32,
    /// `None` leaves the provider default in place.
    pub fragment_retries: Option<u32>,
    /// Request headers, sent in order.
    pub headers: Vec<(String, String)>,
    /// Cap on the produced file name length.
    pub trim_filenames: Option<u32>,
    pub post_process: Option<PostProcess>,
    /// The caller re-encodes the produced file itself after the download.
    pub transcode_after: bool,
}

/// Everything the provider needs to run one download attempt.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub url: String,
    pub unique_id: UniqueId,
    /// Output template, e.g. `<dir>/%(title)s_<uid>.%(ext)s`.
    pub output_template: String,
    pub options: StrategyOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_tolerates_missing_fields() {
        let entry: SearchEntry = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(entry.id.as_deref(), Some("abc"));
        assert!(entry.title.is_none());
        assert!(entry.duration.is_none());
    }

    #[test]
    fn test_entry_accepts_integer_duration() {
        let entry: SearchEntry =
            serde_json::from_str(r#"{"id": "abc", "duration": 212, "extra": true}"#).unwrap();
        assert_eq!(entry.duration, Some(212.0));
    }
}
