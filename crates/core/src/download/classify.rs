use crate::error::{ErrorCategory, ServiceError};
use crate::provider::{ProviderError, ProviderErrorKind};

/// Lowercase fragments that indicate the platform's automation defense.
pub const BOT_MARKERS: &[&str] = &[
    "bot",
    "sign in to confirm",
    "precondition",
    "player response",
    "json",
    "http error 429",
];

const TIMEOUT_MARKERS: &[&str] = &["timeout", "timed out"];

/// Maps a terminal provider fault to a category.
///
/// Message markers win over the error kind: a bot check reported as a
/// download error is still `BlockedByPlatform`.
pub fn classify(error: &ProviderError) -> ErrorCategory {
    let message = error.to_string().to_lowercase();

    if BOT_MARKERS.iter().any(|m| message.contains(m)) {
        ErrorCategory::BlockedByPlatform
    } else if TIMEOUT_MARKERS.iter().any(|m| message.contains(m)) {
        ErrorCategory::Timeout
    } else {
        match error.kind() {
            ProviderErrorKind::Download => ErrorCategory::DownloadFailed,
            ProviderErrorKind::Extraction => ErrorCategory::ExtractionFailed,
            ProviderErrorKind::Other => ErrorCategory::Unknown,
        }
    }
}

/// Classifies `error` and keeps its raw text as the detail.
pub fn classify_failure(error: &ProviderError) -> ServiceError {
    ServiceError::new(classify(error), error.to_string())
}
