//! Search pipeline: query → backend call → unified result list → session state.
//!
//! `SearchService` talks to the backend through `api_client`, `normalize`
//! flattens the summary and web hits into one ordered list, and `SearchStore`
//! tracks the lifecycle of the searches a session runs.

pub mod normalize;
pub mod service;
pub mod store;
pub mod traits;

pub use normalize::{all_search_results, variants, ResultVariant, SUMMARY_SCORE, WEB_HIT_SCORE};
pub use service::{SearchService, SEARCH_PATH};
pub use store::{
    reduce, SearchEvent, SearchOutcome, SearchPhase, SearchState, SearchStore, SearchView,
    DEFAULT_ERROR_MESSAGE,
};
pub use traits::Searcher;
