//! Session-owned search state and the reducer that drives it.
//!
//! Every change goes through `SearchState::apply`, so the lifecycle can be
//! tested without any I/O. `SearchStore` adds the async part: it stamps each
//! search with a sequence number and drops completions that a newer search
//! has superseded.

use std::sync::{Mutex, MutexGuard};

use quickseek_common::SearchResult;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::traits::Searcher;

/// Shown when a failure carries no message of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "Search failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub error: Option<String>,
    /// What the user has typed. Independent of the query being searched.
    pub query: String,
    pub phase: SearchPhase,
    /// Sequence number of the newest dispatched search, 0 before the first.
    pub in_flight: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    QueryChanged(String),
    Started { seq: u64 },
    Succeeded { seq: u64, results: Vec<SearchResult> },
    Failed { seq: u64, message: String },
    ResultsCleared,
}

/// What the UI should render for a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchView<'a> {
    /// Nothing searched yet (or results were cleared).
    NoQuery,
    Loading,
    /// Last search failed; results of the search before it are still shown.
    Failed {
        message: &'a str,
        stale: &'a [SearchResult],
    },
    /// Last search succeeded with nothing to show.
    NoResults,
    Results(&'a [SearchResult]),
}

impl SearchState {
    pub fn apply(&mut self, event: &SearchEvent) {
        match event {
            SearchEvent::QueryChanged(query) => {
                self.query = query.clone();
            }
            SearchEvent::Started { seq } => {
                self.in_flight = *seq;
                self.error = None;
                self.loading = true;
                self.phase = SearchPhase::Pending;
            }
            SearchEvent::Succeeded { seq, results } => {
                if !self.is_current(*seq) {
                    return;
                }
                self.loading = false;
                self.results = results.clone();
                self.phase = SearchPhase::Succeeded;
            }
            SearchEvent::Failed { seq, message } => {
                if !self.is_current(*seq) {
                    return;
                }
                self.loading = false;
                self.error = Some(if message.trim().is_empty() {
                    DEFAULT_ERROR_MESSAGE.to_string()
                } else {
                    message.clone()
                });
                self.phase = SearchPhase::Failed;
            }
            SearchEvent::ResultsCleared => {
                self.results.clear();
                self.error = None;
                if self.phase != SearchPhase::Pending {
                    self.phase = SearchPhase::Idle;
                }
            }
        }
    }

    /// Whether a completion for `seq` belongs to the newest search.
    pub fn is_current(&self, seq: u64) -> bool {
        seq != 0 && seq == self.in_flight
    }

    pub fn view(&self) -> SearchView<'_> {
        if self.loading {
            return SearchView::Loading;
        }
        if let Some(message) = self.error.as_deref() {
            return SearchView::Failed {
                message,
                stale: &self.results,
            };
        }
        match (self.phase, self.results.is_empty()) {
            (_, false) => SearchView::Results(&self.results),
            (SearchPhase::Succeeded, true) => SearchView::NoResults,
            _ => SearchView::NoQuery,
        }
    }
}

/// Pure transition function: `state` after `event`.
pub fn reduce(mut state: SearchState, event: &SearchEvent) -> SearchState {
    state.apply(event);
    state
}

/// How one `run_search` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank query; nothing was sent and the state is unchanged.
    Skipped,
    Succeeded(usize),
    Failed(String),
    /// A newer search was started before this one finished; its result was dropped.
    Superseded,
}

/// The search state of one session, plus the searcher that feeds it.
pub struct SearchStore<S> {
    searcher: S,
    state: Mutex<SearchState>,
}

impl<S: Searcher> SearchStore<S> {
    pub fn new(searcher: S) -> Self {
        Self {
            searcher,
            state: Mutex::new(SearchState::default()),
        }
    }

    pub fn snapshot(&self) -> SearchState {
        self.lock().clone()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.lock().apply(&SearchEvent::QueryChanged(query.into()));
    }

    pub fn clear_results(&self) {
        self.lock().apply(&SearchEvent::ResultsCleared);
    }

    /// Search `query` and record the outcome.
    ///
    /// Concurrent calls are allowed; only the most recently started one may
    /// change `results`, `error` or `loading` when it finishes.
    pub async fn run_search(&self, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            debug!("Ignoring blank search query");
            return SearchOutcome::Skipped;
        }

        let seq = {
            let mut state = self.lock();
            let seq = state.in_flight + 1;
            state.apply(&SearchEvent::Started { seq });
            seq
        };
        info!(seq, query, "Search dispatched");

        let completion = match self.searcher.search(query).await {
            Ok(results) => SearchEvent::Succeeded { seq, results },
            Err(err) => {
                let message = err.message();
                warn!(seq, query, error = %err, "Search failed");
                SearchEvent::Failed { seq, message }
            }
        };

        let mut state = self.lock();
        if !state.is_current(seq) {
            debug!(seq, latest = state.in_flight, "Discarding superseded search completion");
            return SearchOutcome::Superseded;
        }
        state.apply(&completion);

        match completion {
            SearchEvent::Succeeded { results, .. } => {
                info!(seq, count = results.len(), "Search results stored");
                SearchOutcome::Succeeded(results.len())
            }
            _ => SearchOutcome::Failed(
                state
                    .error
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            ),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, score: f64) -> SearchResult {
        SearchResult {
            id: id.into(),
            title: format!("title {id}"),
            content: "content".into(),
            link: None,
            thumbnail_link: None,
            date: "2024-01-01".into(),
            score,
        }
    }

    fn succeeded_with(results: Vec<SearchResult>) -> SearchState {
        let state = reduce(SearchState::default(), &SearchEvent::Started { seq: 1 });
        reduce(state, &SearchEvent::Succeeded { seq: 1, results })
    }

    #[test]
    fn initial_state_is_idle_without_error() {
        let state = SearchState::default();
        assert!(state.results.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.query, "");
        assert_eq!(state.phase, SearchPhase::Idle);
        assert_eq!(state.view(), SearchView::NoQuery);
    }

    #[test]
    fn started_clears_error_and_sets_loading() {
        let mut state = SearchState {
            error: Some("old".into()),
            phase: SearchPhase::Failed,
            ..Default::default()
        };
        state.apply(&SearchEvent::Started { seq: 1 });

        assert!(state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.phase, SearchPhase::Pending);
        assert_eq!(state.view(), SearchView::Loading);
    }

    #[test]
    fn success_replaces_results() {
        let state = succeeded_with(vec![result("a", 1.0), result("b", 0.8)]);
        let state = reduce(state, &SearchEvent::Started { seq: 2 });
        let state = reduce(
            state,
            &SearchEvent::Succeeded {
                seq: 2,
                results: vec![result("c", 0.8)],
            },
        );

        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.phase, SearchPhase::Succeeded);
        let ids: Vec<_> = state.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["c"]);
    }

    #[test]
    fn failure_keeps_previous_results() {
        let before = succeeded_with(vec![result("a", 1.0)]);
        let state = reduce(before.clone(), &SearchEvent::Started { seq: 2 });
        let state = reduce(
            state,
            &SearchEvent::Failed {
                seq: 2,
                message: "boom".into(),
            },
        );

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert_eq!(state.results, before.results);
        assert_eq!(
            state.view(),
            SearchView::Failed {
                message: "boom",
                stale: &before.results
            }
        );
    }

    #[test]
    fn empty_failure_message_uses_default() {
        let state = reduce(SearchState::default(), &SearchEvent::Started { seq: 1 });
        let state = reduce(
            state,
            &SearchEvent::Failed {
                seq: 1,
                message: "  ".into(),
            },
        );
        assert_eq!(state.error.as_deref(), Some(DEFAULT_ERROR_MESSAGE));
    }

    #[test]
    fn empty_success_is_distinct_from_no_query() {
        let state = succeeded_with(vec![]);
        assert_eq!(state.view(), SearchView::NoResults);
        assert_ne!(state.view(), SearchState::default().view());
    }

    #[test]
    fn stale_completions_are_ignored() {
        let state = reduce(SearchState::default(), &SearchEvent::Started { seq: 1 });
        let state = reduce(state, &SearchEvent::Started { seq: 2 });
        let state = reduce(
            state,
            &SearchEvent::Succeeded {
                seq: 1,
                results: vec![result("old", 0.8)],
            },
        );

        assert!(state.loading);
        assert!(state.results.is_empty());

        let state = reduce(
            state,
            &SearchEvent::Failed {
                seq: 1,
                message: "late".into(),
            },
        );
        assert_eq!(state.error, None);
        assert_eq!(state.phase, SearchPhase::Pending);
    }

    #[test]
    fn completion_without_start_is_ignored() {
        let state = reduce(
            SearchState::default(),
            &SearchEvent::Succeeded {
                seq: 0,
                results: vec![result("x", 0.8)],
            },
        );
        assert_eq!(state, SearchState::default());
    }

    #[test]
    fn clear_results_resets_results_and_error_only() {
        let mut state = succeeded_with(vec![result("a", 1.0)]);
        state.apply(&SearchEvent::QueryChanged("cats".into()));
        state.apply(&SearchEvent::Started { seq: 2 });
        state.apply(&SearchEvent::Failed {
            seq: 2,
            message: "boom".into(),
        });

        state.apply(&SearchEvent::ResultsCleared);
        assert!(state.results.is_empty());
        assert_eq!(state.error, None);
        assert!(!state.loading);
        assert_eq!(state.query, "cats");
        assert_eq!(state.view(), SearchView::NoQuery);
    }

    #[test]
    fn clear_results_while_pending_keeps_loading() {
        let mut state = SearchState::default();
        state.apply(&SearchEvent::Started { seq: 1 });
        state.apply(&SearchEvent::ResultsCleared);

        assert!(state.loading);
        assert_eq!(state.phase, SearchPhase::Pending);
    }

    #[test]
    fn query_changes_do_not_touch_lifecycle() {
        let state = reduce(SearchState::default(), &SearchEvent::Started { seq: 1 });
        let state = reduce(state, &SearchEvent::QueryChanged("dogs".into()));

        assert_eq!(state.query, "dogs");
        assert!(state.loading);
        assert_eq!(state.in_flight, 1);
    }
}
