//! Flattening of the backend's two result shapes into one ordered list.

use quickseek_common::{GoogleResult, GptSummary, SearchResponse, SearchResult};

/// Fixed priority of the AI summary. Always ranks first.
pub const SUMMARY_SCORE: f64 = 1.0;

/// Fixed priority of every web hit.
pub const WEB_HIT_SCORE: f64 = 0.8;

/// One backend-origin item before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultVariant {
    Summary(GptSummary),
    WebHit(GoogleResult),
}

impl ResultVariant {
    pub fn score(&self) -> f64 {
        match self {
            ResultVariant::Summary(_) => SUMMARY_SCORE,
            ResultVariant::WebHit(_) => WEB_HIT_SCORE,
        }
    }
}

impl From<ResultVariant> for SearchResult {
    fn from(variant: ResultVariant) -> Self {
        let score = variant.score();
        match variant {
            ResultVariant::Summary(summary) => SearchResult {
                id: summary.id,
                title: summary.title,
                content: summary.content,
                link: None,
                thumbnail_link: None,
                date: summary.date,
                score,
            },
            ResultVariant::WebHit(hit) => SearchResult {
                id: hit.id,
                title: hit.title,
                content: hit.snippet,
                link: Some(hit.link),
                thumbnail_link: hit.thumbnail_link,
                date: hit.date,
                score,
            },
        }
    }
}

/// The summary (if any) followed by the web hits in backend order.
pub fn variants(response: &SearchResponse) -> Vec<ResultVariant> {
    let summary = response.gpt_summary.iter().cloned().map(ResultVariant::Summary);
    let hits = response
        .google_results
        .iter()
        .flatten()
        .cloned()
        .map(ResultVariant::WebHit);
    summary.chain(hits).collect()
}

/// Unified result list for `response`. Empty when neither source is present.
pub fn all_search_results(response: &SearchResponse) -> Vec<SearchResult> {
    variants(response).into_iter().map(SearchResult::from).collect()
}
