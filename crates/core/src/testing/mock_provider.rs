//! Mock extraction provider for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::provider::{DownloadJob, ExtractionProvider, ProviderError, SearchEntry};
use crate::scratch::ScratchSpace;

/// Scripted behavior for one `download` call.
#[derive(Debug)]
pub enum MockDownload {
    /// Writes `<title>_<uid>.<extension>` into the scratch space.
    Produce {
        title: String,
        extension: String,
        bytes: Vec<u8>,
    },
    /// Writes `<title>_<uid>.<extension>`, then fails with the given error.
    ProduceThenFail {
        title: String,
        extension: String,
        error: ProviderError,
    },
    /// Reports success without writing a file.
    ProduceNothing,
    /// Fails with the given error.
    Fail(ProviderError),
}

impl MockDownload {
    pub fn produce(title: &str, extension: &str) -> Self {
        Self::Produce {
            title: title.to_string(),
            extension: extension.to_string(),
            bytes: format!("{}.{}", title, extension).into_bytes(),
        }
    }

    pub fn fail_download(message: &str) -> Self {
        Self::Fail(ProviderError::download(format!("ERROR: {}", message)))
    }

    /// A download that leaves `<title>_<uid>.<extension>` behind and fails.
    pub fn fail_download_leaving(title: &str, extension: &str, message: &str) -> Self {
        Self::ProduceThenFail {
            title: title.to_string(),
            extension: extension.to_string(),
            error: ProviderError::download(format!("ERROR: {}", message)),
        }
    }

    pub fn fail_extraction(message: &str) -> Self {
        Self::Fail(ProviderError::extraction(format!("ERROR: {}", message)))
    }

    pub fn timeout() -> Self {
        Self::Fail(ProviderError::download(
            "ERROR: unable to download video data: The read operation timed out",
        ))
    }
}

#[derive(Debug, Default)]
struct State {
    search_entries: Option<Vec<SearchEntry>>,
    search_error: Option<ProviderError>,
    searches: Vec<(String, usize)>,
    downloads: VecDeque<MockDownload>,
    recorded_downloads: Vec<DownloadJob>,
    download_delay: Option<Duration>,
}

/// Mock implementation of the ExtractionProvider trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search entries, or fail the next search
/// - Script the outcome of each download call in order
/// - Record searches and download jobs for assertions
///
/// Downloads without a scripted outcome produce a file whose extension
/// follows the job's post-processing codec, or `m4a` when there is none.
pub struct MockProvider {
    scratch: Option<Arc<dyn ScratchSpace>>,
    state: Mutex<State>,
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("scratch", &self.scratch.as_ref().map(|s| s.name().to_string()))
            .field("state", &"<state>")
            .finish()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a mock provider that can only search.
    pub fn new() -> Self {
        Self {
            scratch: None,
            state: Mutex::new(State {
                search_entries: Some(Vec::new()),
                ..Default::default()
            }),
        }
    }

    /// Create a mock provider that writes downloads into `scratch`.
    pub fn with_scratch(scratch: Arc<dyn ScratchSpace>) -> Self {
        Self {
            scratch: Some(scratch),
            ..Self::new()
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the entries returned by searches. `None` means no result container.
    pub fn set_search_entries(&self, entries: Option<Vec<SearchEntry>>) {
        self.lock().search_entries = entries;
    }

    /// Configure the next search to fail with the given error.
    pub fn set_search_error(&self, error: ProviderError) {
        self.lock().search_error = Some(error);
    }

    /// Append the outcome of the next unscripted download call.
    pub fn push_download(&self, outcome: MockDownload) {
        self.lock().downloads.push_back(outcome);
    }

    /// Delay every download call by `delay`, after its file is written.
    pub fn set_download_delay(&self, delay: Duration) {
        self.lock().download_delay = Some(delay);
    }

    /// Recorded `(query, limit)` pairs.
    pub fn recorded_searches(&self) -> Vec<(String, usize)> {
        self.lock().searches.clone()
    }

    pub fn search_count(&self) -> usize {
        self.lock().searches.len()
    }

    /// Recorded download jobs, in call order.
    pub fn recorded_downloads(&self) -> Vec<DownloadJob> {
        self.lock().recorded_downloads.clone()
    }

    pub fn download_count(&self) -> usize {
        self.lock().recorded_downloads.len()
    }

    async fn write_file(
        &self,
        job: &DownloadJob,
        title: &str,
        extension: &str,
        bytes: &[u8],
    ) -> Result<(), ProviderError> {
        let scratch = self
            .scratch
            .as_ref()
            .ok_or_else(|| ProviderError::Other("mock has no scratch space".into()))?;
        let name = format!("{}_{}.{}", title, job.unique_id, extension);
        scratch
            .write(&name, bytes)
            .await
            .map_err(|e| ProviderError::Other(e.to_string()))?;
        Ok(())
    }

    fn default_outcome(job: &DownloadJob) -> MockDownload {
        let extension = job
            .options
            .post_process
            .as_ref()
            .map(|p| p.codec.clone())
            .unwrap_or_else(|| "m4a".to_string());
        MockDownload::produce("Mock Track", &extension)
    }
}

#[async_trait]
impl ExtractionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search_flat(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Option<Vec<SearchEntry>>, ProviderError> {
        let mut state = self.lock();
        state.searches.push((query.to_string(), limit));

        if let Some(error) = state.search_error.take() {
            return Err(error);
        }
        Ok(state
            .search_entries
            .clone()
            .map(|entries| entries.into_iter().take(limit).collect()))
    }

    async fn download(&self, job: &DownloadJob) -> Result<(), ProviderError> {
        let (outcome, delay) = {
            let mut state = self.lock();
            state.recorded_downloads.push(job.clone());
            let outcome = state
                .downloads
                .pop_front()
                .unwrap_or_else(|| Self::default_outcome(job));
            (outcome, state.download_delay)
        };

        let result = match outcome {
            MockDownload::Produce {
                title,
                extension,
                bytes,
            } => {
                self.write_file(job, &title, &extension, &bytes).await?;
                Ok(())
            }
            MockDownload::ProduceThenFail {
                title,
                extension,
                error,
            } => {
                let bytes = format!("{}.{}", title, extension).into_bytes();
                self.write_file(job, &title, &extension, &bytes).await?;
                Err(error)
            }
            MockDownload::ProduceNothing => Ok(()),
            MockDownload::Fail(error) => Err(error),
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn validate(&self) -> Result<String, ProviderError> {
        Ok("mock".to_string())
    }
}
