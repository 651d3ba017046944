use std::sync::Arc;
use tracing::{info, warn};

use super::types::{SearchQuery, SearchResult};
use crate::error::{ErrorCategory, ServiceError};
use crate::metrics;
use crate::provider::ExtractionProvider;

/// Maximum number of results returned per search.
pub const SEARCH_LIMIT: usize = 5;

/// Flat keyword search on top of an extraction provider.
pub struct SearchService {
    provider: Arc<dyn ExtractionProvider>,
}

impl SearchService {
    pub fn new(provider: Arc<dyn ExtractionProvider>) -> Self {
        Self { provider }
    }

    /// Searches for `raw_query`, returning at most [`SEARCH_LIMIT`] results.
    ///
    /// Faults are not retried.
    pub async fn search(&self, raw_query: &str) -> Result<Vec<SearchResult>, ServiceError> {
        let query = match SearchQuery::parse(raw_query) {
            Ok(query) => query,
            Err(e) => {
                Self::record(Err(&e));
                return Err(e);
            }
        };

        let entries = match self.provider.search_flat(query.as_str(), SEARCH_LIMIT).await {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!("Search via {} failed: {}", self.provider.name(), e);
                let err = ServiceError {
                    category: ErrorCategory::ExtractionFailed,
                    detail: Some(format!("Search failed: {}", e)),
                };
                Self::record(Err(&err));
                return Err(err);
            }
        };

        let results: Vec<SearchResult> = entries
            .into_iter()
            .filter_map(SearchResult::from_entry)
            .take(SEARCH_LIMIT)
            .collect();

        info!(
            "Search ({} chars) returned {} results",
            query.as_str().len(),
            results.len()
        );
        Self::record(Ok(results.len()));
        Ok(results)
    }

    fn record(outcome: Result<usize, &ServiceError>) {
        match outcome {
            Ok(count) => {
                metrics::SEARCHES_TOTAL.with_label_values(&["success"]).inc();
                metrics::SEARCH_RESULTS.observe(count as f64);
            }
            Err(e) => {
                metrics::SEARCHES_TOTAL
                    .with_label_values(&[e.category.code()])
                    .inc();
            }
        }
    }
}
