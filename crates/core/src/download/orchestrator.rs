use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::classify::classify_failure;
use super::quality::AudioQuality;
use super::request::DownloadRequest;
use super::strategy::{default_strategies, StrategyDescriptor};
use crate::converter::{TranscodeJob, Transcoder};
use crate::error::{ErrorCategory, ServiceError};
use crate::metrics;
use crate::provider::{DownloadJob, ExtractionProvider, ProviderError};
use crate::scratch::{
    cleanup, cleanup_unique_id, register_for_cleanup, register_id_for_cleanup, CleanupGuard,
    ProducedFile, ScratchSpace, UniqueId, TARGET_EXTENSION,
};

/// Result of a single strategy attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Succeeded,
    Failed(ProviderError),
}

/// One strategy attempt within a download.
#[derive(Debug)]
pub struct StrategyAttempt {
    pub strategy_id: u8,
    pub strategy_name: &'static str,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

impl StrategyAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Succeeded)
    }
}

/// A successful download, ready to be streamed.
///
/// Owns the produced file: dropping the outcome, or its `cleanup` guard
/// once moved out, deletes it.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub file: ProducedFile,
    pub cleanup: CleanupGuard,
    /// Id of the winning strategy.
    pub strategy_id: u8,
    pub strategy_name: &'static str,
    /// Every attempt made, the winning one last.
    pub attempts: Vec<StrategyAttempt>,
    /// The file was renamed to mp3 without being re-encoded.
    pub degraded: bool,
}

/// A strategy run that produced a located, normalized file.
struct Completed {
    path: PathBuf,
    strategy_id: u8,
    strategy_name: &'static str,
    attempts: Vec<StrategyAttempt>,
    degraded: bool,
}

/// Runs the ordered fallback strategies for a download.
pub struct DownloadOrchestrator {
    provider: Arc<dyn ExtractionProvider>,
    transcoder: Arc<dyn Transcoder>,
    scratch: Arc<dyn ScratchSpace>,
}

impl DownloadOrchestrator {
    pub fn new(
        provider: Arc<dyn ExtractionProvider>,
        transcoder: Arc<dyn Transcoder>,
        scratch: Arc<dyn ScratchSpace>,
    ) -> Self {
        Self {
            provider,
            transcoder,
            scratch,
        }
    }

    /// The scratch space downloads are written into.
    pub fn scratch(&self) -> &Arc<dyn ScratchSpace> {
        &self.scratch
    }

    /// Decodes a base64 URL, then downloads it.
    ///
    /// A decoding failure is `InvalidInput` and runs no strategy.
    pub async fn download_encoded(
        &self,
        encoded_url: &str,
        quality: AudioQuality,
    ) -> Result<DownloadOutcome, ServiceError> {
        match DownloadRequest::from_encoded(encoded_url, quality) {
            Ok(request) => self.download(request).await,
            Err(e) => {
                debug!("Rejected download request: {}", e);
                metrics::DOWNLOADS_TOTAL
                    .with_label_values(&[e.category.code()])
                    .inc();
                Err(e)
            }
        }
    }

    /// Downloads `request.target_url` as an mp3 in the scratch space.
    pub async fn download(
        &self,
        request: DownloadRequest,
    ) -> Result<DownloadOutcome, ServiceError> {
        let start = Instant::now();
        let result = self.run(&request).await;

        let label = match &result {
            Ok(_) => "success",
            Err(e) => e.category.code(),
        };
        metrics::DOWNLOADS_TOTAL.with_label_values(&[label]).inc();
        metrics::DOWNLOAD_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn run(&self, request: &DownloadRequest) -> Result<DownloadOutcome, ServiceError> {
        let unique_id = UniqueId::generate();
        // Removes whatever this id wrote if the download is dropped midway
        let abandoned = register_id_for_cleanup(Arc::clone(&self.scratch), unique_id.clone());

        let result = match self.run_strategies(request, &unique_id).await {
            Ok(completed) => {
                let removed = cleanup_unique_id(
                    self.scratch.as_ref(),
                    &unique_id,
                    Some(completed.path.as_path()),
                )
                .await;
                if removed > 0 {
                    debug!("Removed {} intermediate files of {}", removed, unique_id);
                }
                Ok(DownloadOutcome {
                    cleanup: register_for_cleanup(
                        Arc::clone(&self.scratch),
                        completed.path.clone(),
                    ),
                    file: ProducedFile::new(completed.path, unique_id),
                    strategy_id: completed.strategy_id,
                    strategy_name: completed.strategy_name,
                    attempts: completed.attempts,
                    degraded: completed.degraded,
                })
            }
            Err(e) => {
                cleanup_unique_id(self.scratch.as_ref(), &unique_id, None).await;
                Err(e)
            }
        };

        abandoned.disarm();
        result
    }

    async fn run_strategies(
        &self,
        request: &DownloadRequest,
        unique_id: &UniqueId,
    ) -> Result<Completed, ServiceError> {
        let strategies = default_strategies(request.quality);
        info!(
            "Starting download {} of {} at {} kbps",
            unique_id, request.target_url, request.quality
        );

        let mut attempts = Vec::with_capacity(strategies.len());
        let mut winner = None;

        for strategy in &strategies {
            let attempt = self.attempt(strategy, request, unique_id).await;
            let succeeded = attempt.succeeded();
            attempts.push(attempt);
            if succeeded {
                winner = Some(strategy);
                break;
            }
            // Leftovers of a failed attempt must not be picked up by the next one
            let removed = cleanup_unique_id(self.scratch.as_ref(), unique_id, None).await;
            if removed > 0 {
                debug!(
                    "Removed {} files left by strategy {} for {}",
                    removed, strategy.id, unique_id
                );
            }
        }

        let Some(strategy) = winner else {
            return Err(Self::exhausted(&attempts));
        };
        info!(
            "Download {} succeeded with strategy {} ({})",
            unique_id, strategy.id, strategy.name
        );

        let mut degraded = false;
        if strategy.options.transcode_after {
            degraded = self.transcode_to_mp3(unique_id, request.quality).await;
        }

        let located = self.locate(unique_id).await?;
        let path = self.normalize(&located).await?;

        Ok(Completed {
            path,
            strategy_id: strategy.id,
            strategy_name: strategy.name,
            attempts,
            degraded,
        })
    }

    async fn attempt(
        &self,
        strategy: &StrategyDescriptor,
        request: &DownloadRequest,
        unique_id: &UniqueId,
    ) -> StrategyAttempt {
        let job = DownloadJob {
            url: request.target_url.clone(),
            unique_id: unique_id.clone(),
            output_template: self.scratch.output_template(unique_id),
            options: strategy.options.clone(),
        };

        let started = Instant::now();
        let outcome = match self.provider.download(&job).await {
            Ok(()) => AttemptOutcome::Succeeded,
            Err(e) => {
                warn!(
                    "Strategy {} ({}) failed for {}: {}",
                    strategy.id, strategy.name, unique_id, e
                );
                AttemptOutcome::Failed(e)
            }
        };

        let label = match &outcome {
            AttemptOutcome::Succeeded => "success",
            AttemptOutcome::Failed(_) => "failed",
        };
        metrics::STRATEGY_ATTEMPTS
            .with_label_values(&[strategy.name, label])
            .inc();

        StrategyAttempt {
            strategy_id: strategy.id,
            strategy_name: strategy.name,
            outcome,
            elapsed: started.elapsed(),
        }
    }

    /// Classifies the last attempt's fault. Earlier faults are only logged.
    fn exhausted(attempts: &[StrategyAttempt]) -> ServiceError {
        let last_error = attempts.iter().rev().find_map(|a| match &a.outcome {
            AttemptOutcome::Failed(e) => Some(e),
            AttemptOutcome::Succeeded => None,
        });

        match last_error {
            Some(e) => {
                let err = classify_failure(e);
                warn!(
                    "All {} strategies failed, classified as {}",
                    attempts.len(),
                    err.category
                );
                err
            }
            None => ServiceError::new(ErrorCategory::Unknown, "no download strategy ran"),
        }
    }

    /// Re-encodes a non-mp3 result. Returns whether the result is degraded.
    ///
    /// On transcode failure the original is kept and later renamed.
    async fn transcode_to_mp3(&self, unique_id: &UniqueId, quality: AudioQuality) -> bool {
        let found = match self.scratch.find_by_suffix(unique_id, TARGET_EXTENSION).await {
            Ok(Some(path)) => path,
            // Reported by the locating step
            Ok(None) | Err(_) => return false,
        };
        let file = ProducedFile::new(found, unique_id.clone());
        if file.has_extension(TARGET_EXTENSION) {
            return false;
        }

        let job = TranscodeJob::mp3(&file.path, quality.kbps());
        let output_path = job.output_path.clone();
        match self.transcoder.transcode(job).await {
            Ok(result) => {
                metrics::TRANSCODES_TOTAL.with_label_values(&["success"]).inc();
                debug!(
                    "Transcoded {} to {:?} in {} ms",
                    file.file_name(),
                    result.output_path,
                    result.duration_ms
                );
                cleanup(self.scratch.as_ref(), &file.path).await;
                false
            }
            Err(e) => {
                // A partial mp3 would otherwise win the lookup
                cleanup(self.scratch.as_ref(), &output_path).await;
                metrics::TRANSCODES_TOTAL.with_label_values(&["failed"]).inc();
                metrics::DEGRADED_DOWNLOADS.inc();
                warn!(
                    "Transcoding {} failed, serving it renamed to .{}: {}",
                    file.file_name(),
                    TARGET_EXTENSION,
                    e
                );
                true
            }
        }
    }

    async fn locate(&self, unique_id: &UniqueId) -> Result<PathBuf, ServiceError> {
        let found = self
            .scratch
            .find_by_suffix(unique_id, TARGET_EXTENSION)
            .await
            .map_err(|e| ServiceError::new(ErrorCategory::FileNotFound, e.to_string()))?;

        found.ok_or_else(|| {
            error!(
                "Strategy reported success but no file carries id {} in {:?}",
                unique_id,
                self.scratch.root()
            );
            ServiceError::bare(ErrorCategory::FileNotFound)
        })
    }

    /// Renames to the mp3 extension if needed. Never re-encodes.
    async fn normalize(&self, path: &Path) -> Result<PathBuf, ServiceError> {
        let current = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        if current.as_deref() == Some(TARGET_EXTENSION) {
            return Ok(path.to_path_buf());
        }

        self.scratch
            .rename_extension(path, TARGET_EXTENSION)
            .await
            .map_err(|e| ServiceError::new(ErrorCategory::FileNotFound, e.to_string()))
    }
}
