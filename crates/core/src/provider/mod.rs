//! Extraction provider module.
//!
//! The provider is the external tool that talks to the video platform. It
//! exposes two operations: a metadata-only flat search, and a download that
//! writes files matching an output template into the scratch space. The
//! production implementation drives the `yt-dlp` executable.

mod config;
mod error;
mod traits;
mod types;
mod ytdlp;

pub use config::ProviderConfig;
pub use error::{ProviderError, ProviderErrorKind};
pub use traits::ExtractionProvider;
pub use types::{DownloadJob, PostProcess, SearchEntry, StrategyOptions};
pub use ytdlp::YtDlpProvider;
