//! User-facing error taxonomy shared by search and download.

use serde::Serialize;
use std::fmt;

/// Category of a failed request, derived from the terminal cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The platform's automation defense was tripped. Retryable by the user.
    BlockedByPlatform,
    /// Socket or process deadline exceeded. Retryable.
    Timeout,
    /// Metadata/extraction level fault reported by the provider.
    ExtractionFailed,
    /// Media transfer fault reported by the provider.
    DownloadFailed,
    /// A strategy reported success but no file carries the unique id.
    FileNotFound,
    /// Malformed or empty request data. Never retried.
    InvalidInput,
    /// Anything else.
    Unknown,
}

impl ErrorCategory {
    /// Stable identifier used in API error bodies and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlockedByPlatform => "blocked_by_platform",
            Self::Timeout => "timeout",
            Self::ExtractionFailed => "extraction_failed",
            Self::DownloadFailed => "download_failed",
            Self::FileNotFound => "file_not_found",
            Self::InvalidInput => "invalid_input",
            Self::Unknown => "unknown",
        }
    }

    /// HTTP status code the transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::Timeout => 408,
            Self::BlockedByPlatform => 503,
            Self::ExtractionFailed
            | Self::DownloadFailed
            | Self::FileNotFound
            | Self::Unknown => 500,
        }
    }

    /// Fixed, user-actionable message for this category.
    pub fn message(&self) -> &'static str {
        match self {
            Self::BlockedByPlatform => {
                "The video platform is currently blocking automated requests. \
                 This is a temporary issue. Please try again in a few minutes \
                 or try a different video."
            }
            Self::Timeout => {
                "Download timeout - the video may be too long or the connection \
                 is slow. Please try again."
            }
            Self::ExtractionFailed => "Failed to extract video information",
            Self::DownloadFailed => "Failed to download audio",
            Self::FileNotFound => "Downloaded file not found",
            Self::InvalidInput => "Invalid request",
            Self::Unknown => "Download failed",
        }
    }

    /// Whether the client may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BlockedByPlatform | Self::Timeout)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A classified failure surfaced to the transport layer.
#[derive(Debug, Clone)]
pub struct ServiceError {
    pub category: ErrorCategory,
    /// Diagnostic text, usually the raw provider message.
    pub detail: Option<String>,
}

impl ServiceError {
    pub fn new(category: ErrorCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: Some(detail.into()),
        }
    }

    pub fn bare(category: ErrorCategory) -> Self {
        Self {
            category,
            detail: None,
        }
    }

    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::new(ErrorCategory::InvalidInput, detail)
    }

    /// Category message with the diagnostic detail appended.
    pub fn message(&self) -> String {
        match &self.detail {
            Some(detail) if !detail.is_empty() => {
                format!("{}: {}", self.category.message(), detail)
            }
            _ => self.category.message().to_string(),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ServiceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorCategory::InvalidInput.status_code(), 400);
        assert_eq!(ErrorCategory::Timeout.status_code(), 408);
        assert_eq!(ErrorCategory::BlockedByPlatform.status_code(), 503);
        assert_eq!(ErrorCategory::FileNotFound.status_code(), 500);
        assert_eq!(ErrorCategory::Unknown.status_code(), 500);
    }

    #[test]
    fn test_message_with_detail() {
        let err = ServiceError::new(ErrorCategory::DownloadFailed, "HTTP Error 403");
        assert_eq!(err.message(), "Failed to download audio: HTTP Error 403");
        assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn test_message_without_detail() {
        let err = ServiceError::bare(ErrorCategory::FileNotFound);
        assert_eq!(err.message(), "Downloaded file not found");
    }

    #[test]
    fn test_category_serializes_as_code() {
        let json = serde_json::to_string(&ErrorCategory::BlockedByPlatform).unwrap();
        assert_eq!(json, "\"blocked_by_platform\"");
        assert_eq!(ErrorCategory::BlockedByPlatform.to_string(), "blocked_by_platform");
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCategory::Timeout.is_retryable());
        assert!(!ErrorCategory::InvalidInput.is_retryable());
    }
}
