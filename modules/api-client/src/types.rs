use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Result};

// --- Client configuration ---

/// Connection settings fixed for the lifetime of an `ApiClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Keep a cookie store and send its cookies with every request.
    pub with_credentials: bool,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(10_000),
            with_credentials: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }
}

// --- Request side ---

/// A primitive query-string value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(n) => write!(f, "{n}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Per-request options. Built with chained setters:
///
/// ```
/// use api_client::RequestOptions;
///
/// let opts = RequestOptions::default()
///     .param("q", "rust")
///     .param("page", 2)
///     .token("secret");
/// assert_eq!(opts.params.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// `None` means GET.
    pub method: Option<Method>,
    /// Appended to the URL in insertion order.
    pub params: Vec<(String, ParamValue)>,
    /// Already-serialized JSON body.
    pub body: Option<String>,
    pub token: Option<String>,
    /// Extra headers; these override the defaults, including `Content-Type`.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` to JSON and use it as the request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let encoded = serde_json::to_string(body)
            .map_err(|e| ApiError::InvalidRequest(format!("body serialization failed: {e}")))?;
        self.body = Some(encoded);
        Ok(self)
    }
}

// --- Response side ---

/// A response body, decoded according to the declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(v) => Some(v),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(t) => Some(t),
            ResponseBody::Json(_) => None,
        }
    }

    /// Error text carried by a failed response's body, if any.
    pub(crate) fn error_message(&self) -> Option<String> {
        match self {
            ResponseBody::Json(value) => ["message", "detail", "error"]
                .iter()
                .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
                .map(str::trim)
                .find(|msg| !msg.is_empty())
                .map(String::from),
            ResponseBody::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }

    fn decode<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value)?),
            ResponseBody::Text(text) => Ok(serde_json::from_str(&text)?),
        }
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T = ResponseBody> {
    pub data: T,
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
}

impl ApiResponse<ResponseBody> {
    /// Decode the body into `T`, keeping status and headers.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<ApiResponse<T>> {
        Ok(ApiResponse {
            data: self.data.decode()?,
            status: self.status,
            status_text: self.status_text,
            headers: self.headers,
        })
    }
}
