use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target MP3 bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "QualityRepr", into = "String")]
pub enum AudioQuality {
    Kbps128,
    Kbps192,
    #[default]
    Kbps256,
    Kbps320,
}

/// Wire forms accepted for a quality: `"320"` or `320`.
#[derive(Deserialize)]
#[serde(untagged)]
enum QualityRepr {
    Text(String),
    Number(u64),
}

impl AudioQuality {
    pub const ALL: [AudioQuality; 4] = [
        AudioQuality::Kbps128,
        AudioQuality::Kbps192,
        AudioQuality::Kbps256,
        AudioQuality::Kbps320,
    ];

    pub fn kbps(self) -> u32 {
        match self {
            Self::Kbps128 => 128,
            Self::Kbps192 => 192,
            Self::Kbps256 => 256,
            Self::Kbps320 => 320,
        }
    }

    pub fn from_kbps(kbps: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|q| u64::from(q.kbps()) == kbps)
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kbps())
    }
}

impl FromStr for AudioQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::from_kbps)
            .ok_or_else(|| invalid(s))
    }
}

impl TryFrom<QualityRepr> for AudioQuality {
    type Error = String;

    fn try_from(repr: QualityRepr) -> Result<Self, Self::Error> {
        match repr {
            QualityRepr::Text(text) => text.parse(),
            QualityRepr::Number(n) => Self::from_kbps(n).ok_or_else(|| invalid(n)),
        }
    }
}

impl From<AudioQuality> for String {
    fn from(quality: AudioQuality) -> Self {
        quality.to_string()
    }
}

fn invalid(value: impl fmt::Display) -> String {
    format!(
        "invalid quality '{}', expected one of 128, 192, 256, 320",
        value
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_256() {
        assert_eq!(AudioQuality::default().kbps(), 256);
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!("128".parse::<AudioQuality>().unwrap(), AudioQuality::Kbps128);
        assert_eq!(" 320 ".parse::<AudioQuality>().unwrap(), AudioQuality::Kbps320);
        assert!("64".parse::<AudioQuality>().is_err());
        assert!("best".parse::<AudioQuality>().is_err());
    }

    #[test]
    fn test_deserialize_string_or_number() {
        let q: AudioQuality = serde_json::from_str("\"192\"").unwrap();
        assert_eq!(q, AudioQuality::Kbps192);
        let q: AudioQuality = serde_json::from_str("320").unwrap();
        assert_eq!(q, AudioQuality::Kbps320);

        let err = serde_json::from_str::<AudioQuality>("\"999\"").unwrap_err();
        assert!(err.to_string().contains("invalid quality"));
        assert!(serde_json::from_str::<AudioQuality>("100").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        assert_eq!(serde_json::to_string(&AudioQuality::Kbps128).unwrap(), "\"128\"");
    }
}
