//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scratch::TARGET_EXTENSION;

/// A single audio transcode to MP3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Target constant bitrate in kbps.
    pub bitrate_kbps: u32,
}

impl TranscodeJob {
    /// Transcodes `input` to a sibling file with the `.mp3` extension.
    pub fn mp3(input: impl Into<PathBuf>, bitrate_kbps: u32) -> Self {
        let input_path = input.into();
        let output_path = input_path.with_extension(TARGET_EXTENSION);
        Self {
            input_path,
            output_path,
            bitrate_kbps,
        }
    }
}

/// Result of a successful transcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeResult {
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp3_job_targets_sibling_file() {
        let job = TranscodeJob::mp3("/scratch/Song_1a2b3c4d.m4a", 192);
        assert_eq!(job.output_path, PathBuf::from("/scratch/Song_1a2b3c4d.mp3"));
        assert_eq!(job.bitrate_kbps, 192);
    }
}
