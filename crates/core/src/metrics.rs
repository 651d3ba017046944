//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Downloads (terminal results, strategy attempts, fallback transcodes)
//! - Searches (results, returned entries)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Download Metrics
// =============================================================================

/// Download requests total by terminal result.
pub static DOWNLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fastmusic_downloads_total", "Total download requests"),
        &["result"], // "success" or an error category code
    )
    .unwrap()
});

/// Download duration in seconds, from decoding to a located file.
pub static DOWNLOAD_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("fastmusic_download_duration_seconds", "Duration of downloads")
            .buckets(vec![1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0]),
        &["result"],
    )
    .unwrap()
});

/// Strategy attempts total.
pub static STRATEGY_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "fastmusic_strategy_attempts_total",
            "Total download strategy attempts",
        ),
        &["strategy", "outcome"], // outcome: "success", "failed"
    )
    .unwrap()
});

/// Explicit transcodes after a strategy without provider post-processing.
pub static TRANSCODES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fastmusic_transcodes_total", "Total fallback transcodes"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Downloads served as renamed-but-not-re-encoded files.
pub static DEGRADED_DOWNLOADS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fastmusic_degraded_downloads_total",
        "Total downloads renamed to mp3 without re-encoding",
    )
    .unwrap()
});

// =============================================================================
// Search Metrics
// =============================================================================

/// Search requests total by result.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fastmusic_searches_total", "Total search requests"),
        &["result"], // "success" or an error category code
    )
    .unwrap()
});

/// Entries returned per search.
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("fastmusic_search_results", "Results returned per search")
            .buckets(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]),
    )
    .unwrap()
});

/// Returns all core metrics for registration with a Prometheus registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Downloads
        Box::new(DOWNLOADS_TOTAL.clone()),
        Box::new(DOWNLOAD_DURATION.clone()),
        Box::new(STRATEGY_ATTEMPTS.clone()),
        Box::new(TRANSCODES_TOTAL.clone()),
        Box::new(DEGRADED_DOWNLOADS.clone()),
        // Searches
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_RESULTS.clone()),
    ]
}
