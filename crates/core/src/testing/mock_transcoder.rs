//! Mock transcoder for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::AsyncReadExt;

use crate::converter::{ConverterError, TranscodeJob, TranscodeResult, Transcoder};
use crate::scratch::ScratchSpace;

/// Mock implementation of the Transcoder trait.
///
/// Copies the input to the output inside the scratch space, or fails when
/// configured to. Every job is recorded.
pub struct MockTranscoder {
    scratch: Arc<dyn ScratchSpace>,
    jobs: Mutex<Vec<TranscodeJob>>,
    fail: Mutex<bool>,
}

impl std::fmt::Debug for MockTranscoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTranscoder")
            .field("scratch", &self.scratch.name())
            .finish()
    }
}

impl MockTranscoder {
    pub fn new(scratch: Arc<dyn ScratchSpace>) -> Self {
        Self {
            scratch,
            jobs: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    /// Make every subsequent transcode fail.
    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    /// Get all recorded transcode jobs.
    pub fn recorded_jobs(&self) -> Vec<TranscodeJob> {
        self.jobs_lock().clone()
    }

    pub fn transcode_count(&self) -> usize {
        self.jobs_lock().len()
    }

    fn jobs_lock(&self) -> MutexGuard<'_, Vec<TranscodeJob>> {
        self.jobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError> {
        self.jobs_lock().push(job.clone());

        if *self.fail.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(ConverterError::transcode_failed(
                "mock transcode failure",
                Some("Invalid data found when processing input".to_string()),
            ));
        }

        let mut reader = self
            .scratch
            .open(&job.input_path)
            .await
            .map_err(|_| ConverterError::InputNotFound {
                path: job.input_path.clone(),
            })?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let file_name = job
            .output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ConverterError::invalid_job("output path has no file name"))?;
        let output_path = self
            .scratch
            .write(&file_name, &bytes)
            .await
            .map_err(|e| ConverterError::transcode_failed(e.to_string(), None))?;

        Ok(TranscodeResult {
            output_path,
            output_size_bytes: bytes.len() as u64,
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Ok(())
    }
}
