use crate::data_models::{RenderedResult, SearchResult};
use crate::snippet;

/// Where the latest request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Settled,
}

/// Ticket handed out for every request that actually goes out. Responses
/// carry it back so the state can tell whether they are still wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub generation: u64,
    pub query: String,
}

/// Last failure of the latest request, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub generation: u64,
    pub query: String,
    pub message: String,
}

/// Whether a response changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Accepted,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
}

/// Query and results of one search session.
///
/// `results` only ever holds the outcome of the latest successful request.
/// Failures and stale responses leave it untouched.
#[derive(Debug, Clone)]
pub struct SearchState {
    query: String,
    results: Vec<SearchResult>,
    phase: Phase,
    last_error: Option<SearchFailure>,
    issued: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            phase: Phase::Idle,
            last_error: None,
            issued: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&SearchFailure> {
        self.last_error.as_ref()
    }

    /// Generation of the most recently issued request, 0 if none.
    pub fn latest_generation(&self) -> u64 {
        self.issued
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Starts a request for the current query. Returns `None` without
    /// touching anything when the query is blank.
    pub fn begin_request(&mut self) -> Option<PendingRequest> {
        if self.query.trim().is_empty() {
            return None;
        }
        self.issued += 1;
        self.phase = Phase::Submitting;
        Some(PendingRequest {
            generation: self.issued,
            query: self.query.clone(),
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.issued
    }

    pub fn apply_success(
        &mut self,
        pending: &PendingRequest,
        results: Vec<SearchResult>,
    ) -> Applied {
        if !self.is_current(pending.generation) {
            return Applied::Stale;
        }
        self.results = results;
        self.last_error = None;
        self.phase = Phase::Settled;
        Applied::Accepted
    }

    pub fn apply_failure(&mut self, pending: &PendingRequest, message: String) -> Applied {
        if !self.is_current(pending.generation) {
            return Applied::Stale;
        }
        self.last_error = Some(SearchFailure {
            generation: pending.generation,
            query: pending.query.clone(),
            message,
        });
        self.phase = Phase::Settled;
        Applied::Accepted
    }

    /// Results as shown to the user, excerpted against the current query.
    pub fn rendered(&self) -> Vec<RenderedResult> {
        self.results
            .iter()
            .map(|result| RenderedResult {
                url: result.url.clone(),
                title: result.title.clone(),
                date: result.date.clone(),
                snippet: snippet::extract(&result.content, &self.query),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(n: u32) -> SearchResult {
        SearchResult::new(
            format!("u{n}"),
            format!("t{n}"),
            format!("d{n}"),
            format!("c{n}"),
        )
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = SearchState::new();
        assert_eq!(state.query(), "");
        assert!(state.results().is_empty());
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.last_error().is_none());
        assert_eq!(state.latest_generation(), 0);
    }

    #[test]
    fn test_blank_query_does_not_begin() {
        let mut state = SearchState::new();
        state.set_query(" \t ");
        assert!(state.begin_request().is_none());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.latest_generation(), 0);
    }

    #[test]
    fn test_begin_keeps_untrimmed_query() {
        let mut state = SearchState::new();
        state.set_query("  rust ");
        let pending = state.begin_request().unwrap();
        assert_eq!(pending.query, "  rust ");
        assert_eq!(pending.generation, 1);
        assert_eq!(state.phase(), Phase::Submitting);
    }

    #[test]
    fn test_success_replaces_results_and_clears_error() {
        let mut state = SearchState::new();
        state.set_query("x");
        let first = state.begin_request().unwrap();
        assert_eq!(state.apply_failure(&first, "boom".into()), Applied::Accepted);
        assert!(state.last_error().is_some());

        let second = state.begin_request().unwrap();
        let applied = state.apply_success(&second, vec![result(1), result(2)]);
        assert_eq!(applied, Applied::Accepted);
        assert_eq!(state.results(), &[result(1), result(2)]);
        assert!(state.last_error().is_none());
        assert_eq!(state.phase(), Phase::Settled);
    }

    #[test]
    fn test_failure_keeps_results() {
        let mut state = SearchState::new();
        state.set_query("x");
        let first = state.begin_request().unwrap();
        state.apply_success(&first, vec![result(1)]);

        let second = state.begin_request().unwrap();
        state.apply_failure(&second, "status 500".into());
        assert_eq!(state.results(), &[result(1)]);
        let failure = state.last_error().unwrap();
        assert_eq!(failure.generation, 2);
        assert_eq!(failure.message, "status 500");
    }

    #[test]
    fn test_stale_responses_are_dropped() {
        let mut state = SearchState::new();
        state.set_query("old");
        let old = state.begin_request().unwrap();
        state.set_query("new");
        let new = state.begin_request().unwrap();

        assert_eq!(state.apply_success(&new, vec![result(2)]), Applied::Accepted);
        assert_eq!(state.apply_success(&old, vec![result(1)]), Applied::Stale);
        assert_eq!(state.apply_failure(&old, "late".into()), Applied::Stale);
        assert_eq!(state.results(), &[result(2)]);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_rendered_uses_current_query() {
        let mut state = SearchState::new();
        state.set_query("body");
        let pending = state.begin_request().unwrap();
        let doc = SearchResult::new(
            "u".into(),
            "t".into(),
            "d".into(),
            "Some body text".into(),
        );
        state.apply_success(&pending, vec![doc]);

        let rendered = state.rendered();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].url, "u");
        assert_eq!(rendered[0].snippet.highlights().collect::<Vec<_>>(), vec!["body"]);

        state.set_query("text");
        let rendered = state.rendered();
        assert_eq!(rendered[0].snippet.highlights().collect::<Vec<_>>(), vec!["text"]);
    }
}
