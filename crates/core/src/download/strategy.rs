use serde::Serialize;

use super::quality::AudioQuality;
use crate::provider::{PostProcess, StrategyOptions};
use crate::scratch::TARGET_EXTENSION;

const WINDOWS_CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const LINUX_CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
const YTDLP_UA: &str = "yt-dlp/2024.07.01";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// One entry of the ordered fallback list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyDescriptor {
    /// 1-based position in the fallback order.
    pub id: u8,
    pub name: &'static str,
    pub options: StrategyOptions,
}

fn header(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

fn mp3_post_process(quality: AudioQuality) -> Option<PostProcess> {
    Some(PostProcess {
        codec: TARGET_EXTENSION.to_string(),
        bitrate_kbps: quality.kbps(),
    })
}

/// The fallback strategies, most featureful first.
pub fn default_strategies(quality: AudioQuality) -> Vec<StrategyDescriptor> {
    vec![
        StrategyDescriptor {
            id: 1,
            name: "full",
            options: StrategyOptions {
                format: "bestaudio/best".to_string(),
                embed_metadata: true,
                socket_timeout_secs: 180,
                retries: 3,
                fragment_retries: Some(3),
                headers: vec![
                    header("User-Agent", WINDOWS_CHROME_UA),
                    header("Accept-Language", ACCEPT_LANGUAGE),
                ],
                trim_filenames: Some(100),
                post_process: mp3_post_process(quality),
                transcode_after: false,
            },
        },
        StrategyDescriptor {
            id: 2,
            name: "reduced",
            options: StrategyOptions {
                format: "bestaudio/best".to_string(),
                embed_metadata: false,
                socket_timeout_secs: 150,
                retries: 2,
                fragment_retries: Some(2),
                headers: vec![header("User-Agent", LINUX_CHROME_UA)],
                trim_filenames: None,
                post_process: mp3_post_process(quality),
                transcode_after: false,
            },
        },
        StrategyDescriptor {
            id: 3,
            name: "minimal",
            options: StrategyOptions {
                format: "bestaudio[ext=m4a]/bestaudio/best".to_string(),
                embed_metadata: false,
                socket_timeout_secs: 120,
                retries: 1,
                fragment_retries: None,
                headers: vec![header("User-Agent", YTDLP_UA)],
                trim_filenames: None,
                post_process: None,
                transcode_after: true,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies_are_ordered() {
        let strategies = default_strategies(AudioQuality::default());
        let ids: Vec<u8> = strategies.iter().map(|s| s.id).collect();
        let names: Vec<&str> = strategies.iter().map(|s| s.name).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(names, ["full", "reduced", "minimal"]);
    }

    #[test]
    fn test_postprocess_carries_requested_bitrate() {
        let strategies = default_strategies(AudioQuality::Kbps192);
        for strategy in &strategies[..2] {
            let post = strategy.options.post_process.as_ref().unwrap();
            assert_eq!(post.codec, "mp3");
            assert_eq!(post.bitrate_kbps, 192);
        }
    }

    #[test]
    fn test_timeouts_and_retries_decrease() {
        let strategies = default_strategies(AudioQuality::default());
        let timeouts: Vec<u64> = strategies
            .iter()
            .map(|s| s.options.socket_timeout_secs)
            .collect();
        let retries: Vec<u32> = strategies.iter().map(|s| s.options.retries).collect();
        assert_eq!(timeouts, [180, 150, 120]);
        assert_eq!(retries, [3, 2, 1]);
    }

    #[test]
    fn test_minimal_defers_transcoding() {
        let minimal = &default_strategies(AudioQuality::default())[2];
        assert!(minimal.options.post_process.is_none());
        assert!(minimal.options.transcode_after);
        assert!(minimal.options.fragment_retries.is_none());
        assert_eq!(minimal.options.headers, [header("User-Agent", "yt-dlp/2024.07.01")]);
        assert_eq!(minimal.options.format, "bestaudio[ext=m4a]/bestaudio/best");
    }

    #[test]
    fn test_full_strategy_headers() {
        let full = &default_strategies(AudioQuality::default())[0];
        assert!(full.options.embed_metadata);
        assert_eq!(full.options.trim_filenames, Some(100));
        assert_eq!(full.options.headers[0].0, "User-Agent");
        assert!(full.options.headers[0].1.contains("Chrome/122"));
        assert_eq!(full.options.headers[1], header("Accept-Language", "en-US,en;q=0.9"));
    }
}
