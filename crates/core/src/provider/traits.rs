//! Trait definitions for the provider module.

use async_trait::async_trait;

use super::error::ProviderError;
use super::types::{DownloadJob, SearchEntry};

/// The external capability that lists and fetches media.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Returns the name of this provider implementation.
    fn name(&self) -> &str;

    /// Metadata-only search returning at most `limit` raw entries.
    ///
    /// `Ok(None)` means the provider answered without a result container.
    async fn search_flat(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Option<Vec<SearchEntry>>, ProviderError>;

    /// Downloads `job.url`, writing files that match `job.output_template`.
    async fn download(&self, job: &DownloadJob) -> Result<(), ProviderError>;

    /// Checks that the provider is usable and returns its version string.
    async fn validate(&self) -> Result<String, ProviderError>;
}
