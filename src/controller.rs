use std::sync::Arc;
use tokio::sync::Mutex;

use crate::client::{SearchBackend, SearchError};
use crate::data_models::RenderedResult;
use crate::state::{Applied, SearchState};

/// What a call to [`SearchController::submit`] ended up doing.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The query was blank; nothing was sent.
    Skipped,
    /// Results were replaced with this many entries.
    Updated(usize),
    /// The request failed; previous results are kept.
    Failed(SearchError),
    /// A newer submission superseded this one before it came back.
    Stale,
}

/// Drives a search session: holds the query and results and issues one
/// request per submission.
///
/// Submissions may overlap. Each gets a generation number and only the
/// latest one is allowed to update the state, so the last submitted query
/// wins no matter in which order the responses arrive.
pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(SearchState::new()),
        }
    }

    pub async fn set_query(&self, text: impl Into<String>) {
        self.state.lock().await.set_query(text);
    }

    pub async fn query(&self) -> String {
        self.state.lock().await.query().to_string()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    pub async fn rendered(&self) -> Vec<RenderedResult> {
        self.state.lock().await.rendered()
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let pending = {
            let mut state = self.state.lock().await;
            state.begin_request()
        };
        let Some(pending) = pending else {
            log::debug!("blank query, nothing to submit");
            return SubmitOutcome::Skipped;
        };

        log::info!(
            "submitting search #{} for {:?}",
            pending.generation,
            pending.query
        );
        // The lock is released while the request is in flight so the query
        // can keep changing and newer submissions can start.
        let response = self.backend.search(&pending.query).await;

        let mut state = self.state.lock().await;
        match response {
            Ok(results) => {
                let count = results.len();
                match state.apply_success(&pending, results) {
                    Applied::Accepted => SubmitOutcome::Updated(count),
                    Applied::Stale => {
                        log::debug!(
                            "dropping stale response #{} (latest is #{})",
                            pending.generation,
                            state.latest_generation()
                        );
                        SubmitOutcome::Stale
                    }
                }
            }
            Err(e) => {
                log::warn!(
                    "search #{} for {:?} failed: {}",
                    pending.generation,
                    pending.query,
                    e
                );
                match state.apply_failure(&pending, e.to_string()) {
                    Applied::Accepted => SubmitOutcome::Failed(e),
                    Applied::Stale => SubmitOutcome::Stale,
                }
            }
        }
    }
}
