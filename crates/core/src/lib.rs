pub mod config;
pub mod converter;
pub mod download;
pub mod error;
pub mod format;
pub mod metrics;
pub mod provider;
pub mod scratch;
pub mod search;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, LogFormat,
};
pub use converter::{FfmpegTranscoder, Transcoder};
pub use download::{AudioQuality, DownloadOrchestrator, DownloadOutcome, DownloadRequest};
pub use error::{ErrorCategory, ServiceError};
pub use provider::{ExtractionProvider, YtDlpProvider};
pub use scratch::{CleanupGuard, FsScratchSpace, ProducedFile, ScratchSpace, UniqueId};
pub use search::{SearchResult, SearchService};
