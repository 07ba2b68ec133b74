use serde::Deserialize;
use std::sync::Arc;

use crate::store::DocumentStore;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub max_hits: usize,
}
