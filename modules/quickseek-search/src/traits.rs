//! Seams between the store and whatever answers its searches.

use api_client::ApiError;
use async_trait::async_trait;
use quickseek_common::SearchResult;

/// Runs one search and returns the unified, ordered result list.
///
/// Implemented by `SearchService` (HTTP backend) and by fakes in tests.
/// Errors are passed through untouched; the store decides how to show them.
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError>;
}

#[async_trait]
impl<T: Searcher + ?Sized> Searcher for std::sync::Arc<T> {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        (**self).search(query).await
    }
}
