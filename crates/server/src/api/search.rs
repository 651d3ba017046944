//! Search API handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use fastmusic_core::SearchResult;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// GET /search?q=<text>
///
/// Top results for a keyword query. A missing `q` is treated as empty.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.unwrap_or_default();
    let results = state.search().search(&query).await?;
    Ok(Json(SearchResponse { results }))
}
