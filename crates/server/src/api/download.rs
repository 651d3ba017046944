//! Download API handler.
//!
//! The download runs in its own task and always completes. The produced file
//! is streamed from the scratch space and deleted once the response body has
//! been fully sent, or as soon as the client is gone.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use fastmusic_core::format::display_title;
use fastmusic_core::{AudioQuality, ErrorCategory, ServiceError};
use futures::StreamExt;
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{error, info};

use super::error::ApiError;
use crate::state::AppState;

/// Header carrying the cleaned, percent-encoded track title.
pub const TRACK_TITLE_HEADER: &str = "x-track-title";
/// Header carrying the id of the strategy that produced the file.
pub const DOWNLOAD_STRATEGY_HEADER: &str = "x-download-strategy";

#[derive(Debug, Deserialize)]
pub struct DownloadBody {
    pub encoded_url: String,
    #[serde(default)]
    pub quality: Option<AudioQuality>,
}

/// POST /download
///
/// Body: `{"encoded_url": "<base64>", "quality"?: "128"|"192"|"256"|"320"}`.
/// A malformed body is an invalid request, not a framework rejection.
pub async fn download(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body: DownloadBody = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::invalid_input(format!("Invalid request body: {}", e)))?;
    let quality = body.quality.unwrap_or_default();

    // Detached so a client disconnect cannot cancel the strategies midway.
    // An outcome nobody awaits any more is dropped, which deletes its file.
    let task_state = Arc::clone(&state);
    let encoded_url = body.encoded_url;
    let outcome = tokio::spawn(async move {
        task_state
            .downloads()
            .download_encoded(&encoded_url, quality)
            .await
    })
    .await
    .map_err(|e| {
        ServiceError::new(ErrorCategory::Unknown, format!("Download task failed: {}", e))
    })??;

    let file = outcome.file;
    // The file is removed whenever the guard goes away
    let guard = outcome.cleanup;
    let scratch = Arc::clone(state.scratch());

    let reader = scratch.open(&file.path).await.map_err(|e| {
        error!("Failed to open {:?} for streaming: {}", file.path, e);
        ServiceError::new(ErrorCategory::FileNotFound, e.to_string())
    })?;
    let size = scratch.size(&file.path).await.ok();

    info!(
        "Serving {} ({} bytes) from strategy {}{}",
        file.file_name(),
        size.map(|s| s.to_string()).unwrap_or_else(|| "?".to_string()),
        outcome.strategy_id,
        if outcome.degraded { ", not re-encoded" } else { "" }
    );

    let stream = ReaderStream::new(reader).map(move |chunk| {
        let _held = &guard;
        chunk
    });

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(header::CONTENT_DISPOSITION, content_disposition(&file.file_name()))
        .header(TRACK_TITLE_HEADER, track_title(&file.stem()))
        .header(DOWNLOAD_STRATEGY_HEADER, outcome.strategy_id.to_string());
    if let Some(size) = size {
        builder = builder.header(header::CONTENT_LENGTH, size);
    }

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError(ServiceError::new(ErrorCategory::Unknown, e.to_string())))
}

/// `attachment` disposition with an ASCII fallback name and an RFC 5987
/// UTF-8 name.
fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn track_title(stem: &str) -> HeaderValue {
    let encoded = urlencoding::encode(&display_title(stem)).into_owned();
    HeaderValue::from_str(&encoded).unwrap_or_else(|_| HeaderValue::from_static(""))
}
