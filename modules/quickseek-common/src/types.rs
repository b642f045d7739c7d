use serde::{Deserialize, Deserializer, Serialize};

// --- Request ---

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

// --- Backend payload ---

/// AI-generated synthesis of the query. At most one per response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GptSummary {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
}

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleResult {
    pub id: String,
    pub title: String,
    pub snippet: String,
    pub link: String,
    #[serde(default)]
    pub thumbnail_link: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
}

/// Raw response of the search backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// `null`, `false`, `0`, `""` and a missing field all mean "no summary".
    #[serde(default, deserialize_with = "truthy")]
    pub gpt_summary: Option<GptSummary>,
    #[serde(default)]
    pub google_results: Option<Vec<GoogleResult>>,
}

fn truthy<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    use serde_json::Value;

    let value = Value::deserialize(deserializer)?;
    let falsy = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    if falsy {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

// --- Unified result ---

/// Display-ready result. Every instance comes from exactly one summary or
/// web hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    pub thumbnail_link: Option<String>,
    pub date: String,
    pub score: f64,
}
