use axum::{
    Json,
    extract::{Query, State},
};
use std::time::Instant;

use crate::data_models::SearchResult;

use super::models::{AppState, SearchParams};

/// `GET /search?query=<q>`: JSON array of matching documents.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchResult>> {
    let start = Instant::now();

    if params.query.trim().is_empty() {
        log::debug!("blank query, answering with no results");
        return Json(Vec::new());
    }

    let results = state.store.search(&params.query, state.max_hits);
    log::info!(
        "query {:?}: {} results in {}us",
        params.query,
        results.len(),
        start.elapsed().as_micros()
    );
    Json(results)
}
