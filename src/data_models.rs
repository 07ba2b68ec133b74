use serde::{Deserialize, Serialize};

use crate::snippet::Snippet;

/// One document as returned by the search endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub date: String,
    /// Full document body, can be thousands of characters.
    pub content: String,
}

impl SearchResult {
    pub fn new(url: String, title: String, date: String, content: String) -> SearchResult {
        SearchResult {
            url,
            title,
            date,
            content,
        }
    }
}

/// What a rendering surface receives for each result: the body is replaced
/// by a bounded, highlighted excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub url: String,
    pub title: String,
    pub date: String,
    pub snippet: Snippet,
}
