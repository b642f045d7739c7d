pub mod error;
pub mod types;
pub mod util;

pub use error::{ApiError, Result};
pub use reqwest::{header, Method, StatusCode};
pub use types::{ApiResponse, ClientConfig, ParamValue, RequestOptions, ResponseBody};

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, error, trace, warn};

use util::{truncate_to_char_boundary, with_query};

/// Request bodies longer than this are cut in debug logs.
const MAX_LOGGED_BODY: usize = 1024;

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .cookie_store(config.with_credentials)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request to `{base_url}{path}`.
    ///
    /// Any 2xx response is returned with its decoded body. A non-2xx response
    /// becomes `ApiError::Transport`; a failure to get a response at all
    /// becomes `ApiError::Network`.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        let RequestOptions {
            method,
            params,
            body,
            token,
            headers: extra_headers,
        } = options;

        let method = method.unwrap_or(Method::GET);
        let url = with_query(&format!("{}{}", self.base_url, path), &params);
        let headers = build_headers(token.as_deref(), &extra_headers)?;

        debug!(
            %method,
            %url,
            headers = ?redacted(&headers),
            body = body.as_deref().map(|b| truncate_to_char_boundary(b, MAX_LOGGED_BODY)),
            "Sending request"
        );

        let started = Instant::now();
        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(err) => {
                let err = ApiError::from(err);
                error!(
                    %method,
                    %url,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "Request failed without a response"
                );
                return Err(err);
            }
        };

        let status = resp.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = resp.headers().clone();
        let is_json = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let bytes = resp.bytes().await?;

        debug!(
            %method,
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        if !status.is_success() {
            // An error page with a JSON content type may still not be JSON
            let data = decode_body(is_json, &bytes)
                .unwrap_or_else(|_| ResponseBody::Text(String::from_utf8_lossy(&bytes).into_owned()));
            warn!(
                %method,
                %url,
                status = status.as_u16(),
                status_text = %status_text,
                data = ?data,
                "Request returned non-success status"
            );
            return Err(ApiError::Transport {
                status,
                status_text,
                headers,
                data,
            });
        }

        let data = decode_body(is_json, &bytes)?;
        trace!(data = ?data, "Response body");

        Ok(ApiResponse {
            data,
            status,
            status_text,
            headers,
        })
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        self.request(path, options.method(Method::GET)).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        self.request(path, options.method(Method::DELETE)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        self.request(path, options.method(Method::POST).json(body)?)
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        self.request(path, options.method(Method::PUT).json(body)?)
            .await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        self.request(path, options.method(Method::PATCH).json(body)?)
            .await
    }
}

/// `Content-Type: application/json`, then caller headers, then the bearer token.
fn build_headers(token: Option<&str>, extra: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("header {name}: {e}")))?;
        headers.insert(name, value);
    }

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ApiError::InvalidRequest(format!("bearer token: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

fn decode_body(is_json: bool, bytes: &[u8]) -> std::result::Result<ResponseBody, serde_json::Error> {
    if !is_json {
        return Ok(ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()));
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponseBody::Json(serde_json::Value::Null));
    }
    serde_json::from_slice(bytes).map(ResponseBody::Json)
}

fn redacted(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if value.is_sensitive() || *name == AUTHORIZATION {
                "<redacted>".to_string()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            (name.to_string(), shown)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_headers_are_json() {
        let headers = build_headers(None, &[]).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn caller_headers_override_content_type() {
        let extra = vec![("content-type".to_string(), "text/plain".to_string())];
        let headers = build_headers(None, &extra).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn token_becomes_bearer_authorization() {
        let headers = build_headers(Some("abc"), &[]).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert!(headers[AUTHORIZATION].is_sensitive());

        let logged = redacted(&headers);
        assert!(logged
            .iter()
            .any(|(name, value)| name == "authorization" && value == "<redacted>"));
    }

    #[test]
    fn invalid_header_is_rejected_before_sending() {
        let err = build_headers(Some("bad\ntoken"), &[]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));

        let extra = vec![("bad header".to_string(), "x".to_string())];
        let err = build_headers(None, &extra).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn decode_body_follows_content_type() {
        assert_eq!(
            decode_body(true, br#"{"a":1}"#).unwrap(),
            ResponseBody::Json(json!({ "a": 1 }))
        );
        assert_eq!(
            decode_body(false, br#"{"a":1}"#).unwrap(),
            ResponseBody::Text(r#"{"a":1}"#.into())
        );
        assert_eq!(decode_body(true, b"  ").unwrap(), ResponseBody::Json(serde_json::Value::Null));
        assert!(decode_body(true, b"<html>").is_err());
    }

    #[test]
    fn new_client_trims_base_url() {
        let client = ApiClient::new(ClientConfig {
            base_url: "http://127.0.0.1:8000//".into(),
            timeout: std::time::Duration::from_secs(1),
            with_credentials: false,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }
}
