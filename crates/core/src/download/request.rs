use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use super::quality::AudioQuality;
use crate::error::ServiceError;

/// Standard alphabet; trailing `=` padding may be present or not.
const URL_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub target_url: String,
    pub quality: AudioQuality,
}

impl DownloadRequest {
    pub fn new(target_url: impl Into<String>, quality: AudioQuality) -> Self {
        Self {
            target_url: target_url.into(),
            quality,
        }
    }

    /// Builds a request from a base64 encoded URL.
    pub fn from_encoded(encoded_url: &str, quality: AudioQuality) -> Result<Self, ServiceError> {
        Ok(Self::new(decode_url(encoded_url)?, quality))
    }
}

/// Decodes a base64 encoded URL, requiring non-empty UTF-8 text.
pub fn decode_url(encoded_url: &str) -> Result<String, ServiceError> {
    let bytes = URL_ENGINE
        .decode(encoded_url.trim())
        .map_err(|e| ServiceError::invalid_input(format!("Invalid base64 encoded URL: {}", e)))?;

    let url = String::from_utf8(bytes).map_err(|e| {
        ServiceError::invalid_input(format!("Invalid base64 encoded URL: {}", e))
    })?;

    let url = url.trim();
    if url.is_empty() {
        return Err(ServiceError::invalid_input("Decoded URL is empty"));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::testing::fixtures::encode_url;

    #[test]
    fn test_decode_roundtrip() {
        let encoded = encode_url("https://example.com/video123");
        assert_eq!(decode_url(&encoded).unwrap(), "https://example.com/video123");
    }

    #[test]
    fn test_decode_without_padding_and_whitespace() {
        // "https://a.b/c" encodes with one '=' of padding
        let encoded = encode_url("https://a.b/c");
        assert!(encoded.ends_with('='));
        let unpadded = format!("  {}\n", encoded.trim_end_matches('='));
        assert_eq!(decode_url(&unpadded).unwrap(), "https://a.b/c");
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_url("not base64 at all!!").unwrap_err();
        assert_eq!(err.category, ErrorCategory::InvalidInput);
        assert!(err.detail.unwrap().starts_with("Invalid base64 encoded URL"));
    }

    #[test]
    fn test_invalid_utf8() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([0xff, 0xfe, 0xfd]);
        let err = decode_url(&encoded).unwrap_err();
        assert_eq!(err.category, ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_empty_url() {
        assert!(decode_url("").is_err());
        assert!(decode_url(&encode_url("   ")).is_err());
    }

    #[test]
    fn test_from_encoded_keeps_quality() {
        let request =
            DownloadRequest::from_encoded(&encode_url("https://x.y/z"), AudioQuality::Kbps128)
                .unwrap();
        assert_eq!(request.target_url, "https://x.y/z");
        assert_eq!(request.quality, AudioQuality::Kbps128);
    }
}
