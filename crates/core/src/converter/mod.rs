//! Converter module for transcoding audio files.
//!
//! This module provides the `Transcoder` trait and an FFmpeg-backed
//! implementation used by the last-resort download strategy, which fetches a
//! raw audio stream and re-encodes it to MP3 itself.
//!
//! # Example
//!
//! ```ignore
//! use fastmusic_core::converter::{FfmpegTranscoder, Transcoder, TranscodeJob};
//!
//! let transcoder = FfmpegTranscoder::with_defaults();
//! transcoder.validate().await?;
//!
//! let job = TranscodeJob::mp3("downloads/Song_1a2b3c4d.m4a", 256);
//! let result = transcoder.transcode(job).await?;
//! println!("Wrote {:?} in {} ms", result.output_path, result.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{TranscodeJob, TranscodeResult};
