//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{TranscodeJob, TranscodeResult};

/// A transcoder that re-encodes audio files.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Re-encodes `job.input_path` into `job.output_path`.
    ///
    /// The input is left in place; callers decide whether to remove it.
    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError>;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CopyTranscoder;

    #[async_trait]
    impl Transcoder for CopyTranscoder {
        fn name(&self) -> &str {
            "copy"
        }

        async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError> {
            let bytes = tokio::fs::copy(&job.input_path, &job.output_path).await?;
            Ok(TranscodeResult {
                output_path: job.output_path,
                output_size_bytes: bytes,
                duration_ms: 0,
            })
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_transcoder_as_trait_object() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("Song_1a2b3c4d.m4a");
        tokio::fs::write(&input, b"abc").await.unwrap();

        let transcoder: Box<dyn Transcoder> = Box::new(CopyTranscoder);
        let result = transcoder.transcode(TranscodeJob::mp3(&input, 128)).await.unwrap();

        assert_eq!(transcoder.name(), "copy");
        assert_eq!(result.output_size_bytes, 3);
        assert!(result.output_path.ends_with("Song_1a2b3c4d.mp3"));
    }
}
