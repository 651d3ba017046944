use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::format::format_duration;
use crate::provider::SearchEntry;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// A validated, trimmed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::invalid_input("Search query cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One normalized search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub duration: String,
}

impl SearchResult {
    /// Normalizes a raw entry. Entries without an id yield `None`.
    pub fn from_entry(entry: SearchEntry) -> Option<Self> {
        let video_id = entry.id.filter(|id| !id.trim().is_empty())?;
        let title = non_empty(entry.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let channel = non_empty(entry.uploader)
            .or_else(|| non_empty(entry.channel))
            .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string());

        Some(Self {
            video_id,
            title,
            channel,
            duration: format_duration(entry.duration),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(SearchQuery::parse("  lofi beats ").unwrap().as_str(), "lofi beats");
    }

    #[test]
    fn test_blank_query_rejected() {
        for raw in ["", "   ", "\t\n"] {
            let err = SearchQuery::parse(raw).unwrap_err();
            assert_eq!(err.category, crate::error::ErrorCategory::InvalidInput);
            assert_eq!(err.detail.as_deref(), Some("Search query cannot be empty"));
        }
    }

    #[test]
    fn test_result_fallbacks() {
        let result = SearchResult::from_entry(SearchEntry {
            id: Some("abc".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(result.title, UNKNOWN_TITLE);
        assert_eq!(result.channel, UNKNOWN_CHANNEL);
        assert_eq!(result.duration, "Unknown");
    }

    #[test]
    fn test_channel_falls_back_to_channel_field() {
        let result = SearchResult::from_entry(SearchEntry {
            id: Some("abc".into()),
            title: Some("Song".into()),
            channel: Some("Label".into()),
            duration: Some(125.0),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(result.channel, "Label");
        assert_eq!(result.duration, "2:05");
    }

    #[test]
    fn test_uploader_preferred_over_channel() {
        let result = SearchResult::from_entry(SearchEntry {
            id: Some("abc".into()),
            uploader: Some("Uploader".into()),
            channel: Some("Label".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(result.channel, "Uploader");
    }

    #[test]
    fn test_missing_or_empty_id_dropped() {
        assert!(SearchResult::from_entry(SearchEntry::default()).is_none());
        assert!(SearchResult::from_entry(SearchEntry {
            id: Some(String::new()),
            ..Default::default()
        })
        .is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let result = SearchResult {
            video_id: "abc".into(),
            title: "Song".into(),
            channel: "Chan".into(),
            duration: "3:07".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"video_id": "abc", "title": "Song", "channel": "Chan", "duration": "3:07"})
        );
    }
}
