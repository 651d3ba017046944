use std::sync::Arc;

use fastmusic_core::{
    Config, DownloadOrchestrator, ExtractionProvider, ScratchSpace, SearchService, Transcoder,
};

/// Shared application state
pub struct AppState {
    config: Config,
    search: SearchService,
    downloads: DownloadOrchestrator,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn ExtractionProvider>,
        transcoder: Arc<dyn Transcoder>,
        scratch: Arc<dyn ScratchSpace>,
    ) -> Self {
        Self {
            config,
            search: SearchService::new(Arc::clone(&provider)),
            downloads: DownloadOrchestrator::new(provider, transcoder, scratch),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn downloads(&self) -> &DownloadOrchestrator {
        &self.downloads
    }

    pub fn scratch(&self) -> &Arc<dyn ScratchSpace> {
        self.downloads.scratch()
    }
}
