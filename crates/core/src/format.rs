//! Display formatting for provider metadata.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Fallback when a duration is missing or unusable.
pub const UNKNOWN_DURATION: &str = "Unknown";

/// Decorations stripped from the edges of a title, longest first.
const TITLE_DECORATIONS: &[&str] = &[
    "official music video",
    "official lyric video",
    "explicit version",
    "extended version",
    "live performance",
    "acoustic version",
    "official video",
    "official audio",
    "clean version",
    "lyrics video",
    "music video",
    "lyric video",
    "radio edit",
    "official",
    "acoustic",
    "remix",
    "live",
    "hd",
    "hq",
    "4k",
];

static UNIQUE_ID_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)_[a-f0-9-]{8}$").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static EMPTY_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[(\[{][)\]}]*\s*$").expect("valid regex"));

/// Renders a duration in seconds as `M:SS`.
///
/// Minutes are not folded into hours, so a 3725 second video reads `62:05`.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() && s > 0.0 => {
            let total = s as u64;
            format!("{}:{:02}", total / 60, total % 60)
        }
        _ => UNKNOWN_DURATION.to_string(),
    }
}

/// Prefix and suffix patterns for each decoration. A suffix only matches when
/// a separator precedes it, so "Alive" keeps its "live".
static DECORATION_PATTERNS: Lazy<Vec<(Regex, Regex)>> = Lazy::new(|| {
    TITLE_DECORATIONS
        .iter()
        .map(|term| {
            let prefix = Regex::new(&format!(r"(?i)^\s*\(?{term}\)?\s*(?:for|of|:|-|\s)+"))
                .expect("valid regex");
            let suffix = Regex::new(&format!(r"(?i)[\s\-|(\[]+{term}[)\]]?\s*$"))
                .expect("valid regex");
            (prefix, suffix)
        })
        .collect()
});

/// Derives a human readable title from a scratch file stem.
///
/// Strips the trailing unique id, underscores, and common upload decorations
/// such as "(Official Video)" or "HD".
pub fn display_title(stem: &str) -> String {
    let base = UNIQUE_ID_SUFFIX.replace(stem, "").replace('_', " ");
    let base = WHITESPACE.replace_all(&base, " ").trim().to_string();

    let mut cleaned = base.clone();
    for (prefix, _) in DECORATION_PATTERNS.iter() {
        cleaned = prefix.replace(&cleaned, "").into_owned();
    }
    for (_, suffix) in DECORATION_PATTERNS.iter() {
        cleaned = suffix.replace(&cleaned, "").into_owned();
    }

    let cleaned = EMPTY_BRACKETS.replace(&cleaned, "");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ").trim().to_string();

    if cleaned.is_empty() {
        base
    } else {
        cleaned
    }
}
