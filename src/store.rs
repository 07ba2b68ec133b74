use anyhow::{Context, Result};
use std::path::Path;

use crate::config::CONFIG;
use crate::data_models::SearchResult;
use crate::snippet;

/// In-memory corpus served by the local search endpoint.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<SearchResult>,
}

impl DocumentStore {
    pub fn new(documents: Vec<SearchResult>) -> Self {
        Self { documents }
    }

    /// Load a JSON array of documents from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
        let documents: Vec<SearchResult> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse corpus file {}", path.display()))?;
        log::info!("loaded {} documents from {}", documents.len(), path.display());
        Ok(Self::new(documents))
    }

    pub fn from_config() -> Result<Self> {
        Self::load(&CONFIG.corpus_path)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[SearchResult] {
        &self.documents
    }

    /// Documents whose body contains `query`, ignoring case, in corpus
    /// order. Matching is the one excerpts are highlighted with, so every
    /// hit gets at least one highlight. A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.documents
            .iter()
            .filter(|doc| snippet::contains(&doc.content, query))
            .take(limit)
            .cloned()
            .collect()
    }
}
