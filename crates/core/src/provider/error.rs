//! Error types for the provider module.

use std::path::PathBuf;
use thiserror::Error;

/// Stderr fragments that mark a media transfer fault rather than an
/// extraction fault.
const DOWNLOAD_MARKERS: &[&str] = &[
    "unable to download",
    "http error",
    "fragment",
    "giving up after",
    "connection",
    "timed out",
    "postprocessing",
    "did not get any data",
];

/// Errors reported by an extraction provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Media transfer failed after extraction succeeded.
    #[error("{message}")]
    Download { message: String },

    /// Metadata extraction failed (unsupported URL, unavailable video, ...).
    #[error("{message}")]
    Extraction { message: String },

    /// The provider process exceeded its wall-clock limit and was killed.
    #[error("Provider process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Provider binary not found.
    #[error("yt-dlp not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// Provider output could not be parsed.
    #[error("Failed to parse provider output: {0}")]
    Parse(String),

    /// I/O error while running the provider.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other provider failure.
    #[error("{0}")]
    Other(String),
}

/// Coarse level at which a provider fault happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Download,
    Extraction,
    Other,
}

impl ProviderError {
    pub fn download(message: impl Into<String>) -> Self {
        Self::Download {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Download { .. } => ProviderErrorKind::Download,
            Self::Extraction { .. } => ProviderErrorKind::Extraction,
            _ => ProviderErrorKind::Other,
        }
    }

    /// Classifies the stderr of a failed provider run.
    ///
    /// `ERROR:` lines carrying a transfer marker become `Download`, other
    /// `ERROR:` lines become `Extraction`, and output without an `ERROR:`
    /// line becomes `Other`.
    pub fn from_stderr(stderr: &str, exit_code: Option<i32>) -> Self {
        let error_lines: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("ERROR:"))
            .collect();

        if error_lines.is_empty() {
            let trimmed = stderr.trim();
            return if trimmed.is_empty() {
                Self::Other(format!("yt-dlp exited with code: {:?}", exit_code))
            } else {
                Self::Other(trimmed.to_string())
            };
        }

        let message = error_lines.join("\n");
        let lower = message.to_lowercase();
        if DOWNLOAD_MARKERS.iter().any(|marker| lower.contains(marker)) {
            Self::download(message)
        } else {
            Self::extraction(message)
        }
    }
}
