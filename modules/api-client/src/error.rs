use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ResponseBody;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was obtained: DNS, connect, timeout, or a broken body stream.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered outside the 2xx range.
    #[error("API error (status {}): {status_text}", .status.as_u16())]
    Transport {
        status: StatusCode,
        status_text: String,
        headers: HeaderMap,
        data: ResponseBody,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    /// The request could not be assembled; nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status of a `Transport` error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message suitable for showing to a user.
    ///
    /// Transport errors prefer a `message`, `detail` or `error` string from a
    /// JSON body, then a non-empty text body, then the status line.
    pub fn message(&self) -> String {
        match self {
            ApiError::Network(msg) | ApiError::Parse(msg) | ApiError::InvalidRequest(msg) => {
                msg.clone()
            }
            ApiError::Transport {
                status,
                status_text,
                data,
                ..
            } => data
                .error_message()
                .unwrap_or_else(|| {
                    format!("Request failed with status {} {}", status.as_u16(), status_text)
                        .trim_end()
                        .to_string()
                }),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiError::Network(format!("request timed out: {err}"));
        }
        // reqwest's own text hides the cause ("error sending request for url")
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ApiError::Network(message)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}
