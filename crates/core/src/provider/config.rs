//! Configuration for the extraction provider.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the yt-dlp backed provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Path to yt-dlp binary.
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    /// Wall-clock limit for a flat search invocation.
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,

    /// Wall-clock limit for a single download invocation.
    #[serde(default = "default_process_timeout")]
    pub process_timeout_secs: u64,

    /// Arguments placed before the generated ones (e.g. `--cookies <file>`).
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_search_timeout() -> u64 {
    60
}

fn default_process_timeout() -> u64 {
    900
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            search_timeout_secs: default_search_timeout(),
            process_timeout_secs: default_process_timeout(),
            extra_args: Vec::new(),
        }
    }
}

impl ProviderConfig {
    /// Creates a new config with a custom yt-dlp path.
    pub fn with_path(ytdlp_path: PathBuf) -> Self {
        Self {
            ytdlp_path,
            ..Default::default()
        }
    }
}
