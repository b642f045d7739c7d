use api_client::{ApiClient, ApiError, ClientConfig, RequestOptions};
use async_trait::async_trait;
use quickseek_common::{Config, SearchRequest, SearchResponse, SearchResult};
use tracing::{error, info};

use crate::normalize::all_search_results;
use crate::traits::Searcher;

/// Backend endpoint for search requests.
pub const SEARCH_PATH: &str = "/api/search";

pub struct SearchService {
    client: ApiClient,
    token: Option<String>,
}

impl SearchService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            token: None,
        }
    }

    /// Build the HTTP client from process configuration.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client_config = ClientConfig::new(&config.api_base_url)
            .with_timeout(config.api_timeout)
            .with_credentials(config.with_credentials);
        Ok(Self::new(ApiClient::new(client_config)?))
    }

    /// Send `token` as a bearer credential on every search.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Raw backend call: `POST /api/search` with `{"query": ...}`.
    pub async fn search_content(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        let mut options = RequestOptions::default();
        if let Some(ref token) = self.token {
            options = options.token(token.clone());
        }

        let response = self
            .client
            .post(SEARCH_PATH, request, options)
            .await
            .and_then(|resp| resp.into_json::<SearchResponse>());

        match response {
            Ok(resp) => Ok(resp.data),
            Err(err) => {
                error!(query = %request.query, error = %err, "Search request failed");
                Err(err)
            }
        }
    }

    /// Search `query` and return the unified result list.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let response = self.search_content(&SearchRequest::new(query)).await?;
        let results = all_search_results(&response);
        info!(
            query,
            has_summary = response.gpt_summary.is_some(),
            count = results.len(),
            "Search completed"
        );
        Ok(results)
    }
}

#[async_trait]
impl Searcher for SearchService {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        SearchService::search(self, query).await
    }
}
