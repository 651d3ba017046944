//! yt-dlp backed provider implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use super::config::ProviderConfig;
use super::error::ProviderError;
use super::traits::ExtractionProvider;
use super::types::{DownloadJob, SearchEntry};

/// Top-level object of `--dump-single-json` in flat mode.
#[derive(Debug, Deserialize)]
struct FlatPlaylist {
    #[serde(default)]
    entries: Option<Vec<serde_json::Value>>,
}

/// Provider that shells out to the `yt-dlp` executable.
pub struct YtDlpProvider {
    config: ProviderConfig,
}

impl YtDlpProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ProviderConfig::default())
    }

    fn build_search_args(&self, query: &str, limit: usize) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        args.extend([
            "--flat-playlist".to_string(),
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            "--".to_string(),
            format!("ytsearch{}:{}", limit, query),
        ]);
        args
    }

    fn build_download_args(&self, job: &DownloadJob) -> Vec<String> {
        let options = &job.options;
        let mut args = self.config.extra_args.clone();
        args.extend([
            "-f".to_string(),
            options.format.clone(),
            "-o".to_string(),
            job.output_template.clone(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            options.socket_timeout_secs.to_string(),
            "--retries".to_string(),
            options.retries.to_string(),
        ]);

        if let Some(fragment_retries) = options.fragment_retries {
            args.extend([
                "--fragment-retries".to_string(),
                fragment_retries.to_string(),
            ]);
        }

        if let Some(max_len) = options.trim_filenames {
            args.extend(["--trim-filenames".to_string(), max_len.to_string()]);
        }

        for (name, value) in &options.headers {
            args.extend(["--add-header".to_string(), format!("{}:{}", name, value)]);
        }

        if options.embed_metadata {
            args.push("--embed-metadata".to_string());
        }

        if let Some(ref post) = options.post_process {
            args.extend([
                "-x".to_string(),
                "--audio-format".to_string(),
                post.codec.clone(),
                "--audio-quality".to_string(),
                format!("{}K", post.bitrate_kbps),
            ]);
        }

        // Keeps a URL starting with '-' from being read as an option
        args.push("--".to_string());
        args.push(job.url.clone());
        args
    }

    /// Runs yt-dlp, killing it once `timeout_secs` elapses.
    async fn run(&self, args: &[String], timeout_secs: u64) -> Result<Output, ProviderError> {
        debug!("Running {:?} {}", self.config.ytdlp_path, args.join(" "));

        let child = Command::new(&self.config.ytdlp_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ProviderError::ToolNotFound {
                        path: self.config.ytdlp_path.clone(),
                    }
                } else {
                    ProviderError::Io(e)
                }
            })?;

        match timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(ProviderError::Timeout { timeout_secs }),
        }
    }

    fn failure(output: &Output) -> ProviderError {
        let stderr = String::from_utf8_lossy(&output.stderr);
        ProviderError::from_stderr(&stderr, output.status.code())
    }

    /// Parses flat search output, dropping entries that are not objects.
    fn parse_search_output(
        stdout: &[u8],
        limit: usize,
    ) -> Result<Option<Vec<SearchEntry>>, ProviderError> {
        let text = String::from_utf8_lossy(stdout);
        let text = text.trim();
        if text.is_empty() || text == "null" {
            return Ok(None);
        }

        let playlist: FlatPlaylist =
            serde_json::from_str(text).map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(playlist.entries.map(|entries| {
            entries
                .into_iter()
                .filter_map(|value| match serde_json::from_value::<SearchEntry>(value) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        debug!("Skipping malformed search entry: {}", e);
                        None
                    }
                })
                .take(limit)
                .collect()
        }))
    }
}

#[async_trait]
impl ExtractionProvider for YtDlpProvider {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn search_flat(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Option<Vec<SearchEntry>>, ProviderError> {
        let args = self.build_search_args(query, limit);
        let output = self.run(&args, self.config.search_timeout_secs).await?;

        if !output.status.success() {
            return Err(Self::failure(&output));
        }
        Self::parse_search_output(&output.stdout, limit)
    }

    async fn download(&self, job: &DownloadJob) -> Result<(), ProviderError> {
        let args = self.build_download_args(job);
        let output = self.run(&args, self.config.process_timeout_secs).await?;

        if !output.status.success() {
            let err = Self::failure(&output);
            warn!("yt-dlp download of {} failed: {}", job.url, err);
            return Err(err);
        }
        Ok(())
    }

    async fn validate(&self) -> Result<String, ProviderError> {
        let mut args = self.config.extra_args.clone();
        args.push("--version".to_string());
        let output = self.run(&args, self.config.search_timeout_secs).await?;

        if !output.status.success() {
            return Err(Self::failure(&output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{PostProcess, ProviderErrorKind, StrategyOptions};
    use crate::scratch::UniqueId;
    use std::path::PathBuf;

    fn job(options: StrategyOptions) -> DownloadJob {
        DownloadJob {
            url: "https://example.com/video123".to_string(),
            unique_id: UniqueId::new("0123abcd"),
            output_template: "/scratch/%(title)s_0123abcd.%(ext)s".to_string(),
            options,
        }
    }

    fn full_options() -> StrategyOptions {
        StrategyOptions {
            format: "bestaudio/best".to_string(),
            embed_metadata: true,
            socket_timeout_secs: 180,
            retries: 3,
            fragment_retries: Some(3),
            headers: vec![("Accept-Language".to_string(), "en-US,en;q=0.9".to_string())],
            trim_filenames: Some(100),
            post_process: Some(PostProcess {
                codec: "mp3".to_string(),
                bitrate_kbps: 320,
            }),
            transcode_after: false,
        }
    }

    fn position(args: &[String], flag: &str) -> usize {
        args.iter().position(|a| a == flag).unwrap()
    }

    /// Runs `script` through `sh -c`; generated arguments land in `$1..`.
    fn shell_provider(script: &str, process_timeout_secs: u64) -> YtDlpProvider {
        YtDlpProvider::new(ProviderConfig {
            ytdlp_path: PathBuf::from("/bin/sh"),
            search_timeout_secs: process_timeout_secs,
            process_timeout_secs,
            extra_args: vec!["-c".to_string(), script.to_string(), "yt-dlp".to_string()],
        })
    }

    #[test]
    fn test_search_args() {
        let provider = YtDlpProvider::with_defaults();
        let args = provider.build_search_args("daft punk", 5);
        assert_eq!(
            args,
            [
                "--flat-playlist",
                "--dump-single-json",
                "--no-warnings",
                "--",
                "ytsearch5:daft punk"
            ]
        );
    }

    #[test]
    fn test_download_args_full() {
        let provider = YtDlpProvider::with_defaults();
        let args = provider.build_download_args(&job(full_options()));

        assert_eq!(args[position(&args, "-f") + 1], "bestaudio/best");
        assert_eq!(
            args[position(&args, "-o") + 1],
            "/scratch/%(title)s_0123abcd.%(ext)s"
        );
        assert_eq!(args[position(&args, "--socket-timeout") + 1], "180");
        assert_eq!(args[position(&args, "--fragment-retries") + 1], "3");
        assert_eq!(args[position(&args, "--trim-filenames") + 1], "100");
        assert_eq!(
            args[position(&args, "--add-header") + 1],
            "Accept-Language:en-US,en;q=0.9"
        );
        assert!(args.contains(&"--embed-metadata".to_string()));
        assert!(args.contains(&"-x".to_string()));
        assert_eq!(args[position(&args, "--audio-quality") + 1], "320K");
        assert_eq!(args.last().unwrap(), "https://example.com/video123");
    }

    #[test]
    fn test_download_args_minimal() {
        let provider = YtDlpProvider::with_defaults();
        let options = StrategyOptions {
            format: "bestaudio[ext=m4a]/bestaudio/best".to_string(),
            embed_metadata: false,
            socket_timeout_secs: 120,
            retries: 1,
            fragment_retries: None,
            headers: vec![],
            trim_filenames: None,
            post_process: None,
            transcode_after: true,
        };
        let args = provider.build_download_args(&job(options));

        assert!(!args.contains(&"--fragment-retries".to_string()));
        assert!(!args.contains(&"--embed-metadata".to_string()));
        assert!(!args.contains(&"-x".to_string()));
        assert!(!args.contains(&"--trim-filenames".to_string()));
        assert_eq!(args[position(&args, "--retries") + 1], "1");
    }

    #[test]
    fn test_parse_search_output() {
        let stdout = br#"{"_type": "playlist", "entries": [
            {"id": "a1", "title": "One", "uploader": "Chan", "duration": 61.0},
            {"title": "no id"},
            "garbage",
            {"id": "b2", "channel": "Other"}
        ]}"#;
        let entries = YtDlpProvider::parse_search_output(stdout, 5).unwrap().unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id.as_deref(), Some("a1"));
        assert_eq!(entries[2].channel.as_deref(), Some("Other"));
    }

    #[test]
    fn test_parse_search_output_without_container() {
        assert!(YtDlpProvider::parse_search_output(b"", 5).unwrap().is_none());
        assert!(YtDlpProvider::parse_search_output(b"null", 5).unwrap().is_none());
        assert!(YtDlpProvider::parse_search_output(b"{}", 5).unwrap().is_none());
        assert!(matches!(
            YtDlpProvider::parse_search_output(b"<html>", 5),
            Err(ProviderError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let provider =
            YtDlpProvider::new(ProviderConfig::with_path(PathBuf::from("/nonexistent/yt-dlp")));
        let result = provider.search_flat("query", 5).await;
        assert!(matches!(result, Err(ProviderError::ToolNotFound { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_search_reads_stdout() {
        let provider = shell_provider(
            r#"echo '{"entries": [{"id": "a1", "title": "One"}]}'"#,
            10,
        );
        let entries = provider.search_flat("one", 5).await.unwrap().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("One"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_failure_is_classified() {
        let provider = shell_provider(
            "echo 'ERROR: unable to download video data: HTTP Error 403' >&2; exit 1",
            10,
        );
        let err = provider.download(&job(full_options())).await.unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::Download);
        assert!(err.to_string().contains("HTTP Error 403"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_timeout_kills_process() {
        let provider = shell_provider("sleep 30", 1);
        let err = provider.download(&job(full_options())).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { timeout_secs: 1 }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_receives_url_last() {
        let provider = shell_provider(
            r#"for last; do :; done; [ "$last" = "https://example.com/video123" ]"#,
            10,
        );
        provider.download(&job(full_options())).await.unwrap();
    }
}
