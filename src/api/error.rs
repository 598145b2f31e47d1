//! Error types for calls to the course backend.

use reqwest::StatusCode;
use thiserror::Error;

/// Broad category of a failed backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Backend,
    Decode,
    InvalidUrl,
}

/// A failed backend call, tagged with what went wrong
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout)
    #[error("Network error: {message}")]
    Transport { message: String },

    /// The backend answered with a non-success status
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Unexpected response: {message}")]
    Decode { message: String },

    /// The configured API root cannot be used to build request URLs
    #[error("Invalid API URL: {message}")]
    InvalidUrl { message: String },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } => ErrorKind::Transport,
            ApiError::Backend { .. } => ErrorKind::Backend,
            ApiError::Decode { .. } => ErrorKind::Decode,
            ApiError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
        }
    }

    /// The message to show the user as-is
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message }
            | ApiError::Backend { message, .. }
            | ApiError::Decode { message }
            | ApiError::InvalidUrl { message } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build a backend error from a non-success response body
    ///
    /// The backend reports failures as `{"error": "..."}`; anything else is
    /// passed through verbatim.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        ApiError::Backend {
            status: status.as_u16(),
            message: backend_message(status, body),
        }
    }
}

fn backend_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["error", "message"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
        if let Some(text) = value.as_str() {
            return text.to_string();
        }
    }

    if body.is_empty() {
        status
            .canonical_reason()
            .map(String::from)
            .unwrap_or_else(|| status.to_string())
    } else {
        body.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode {
                message: err.to_string(),
            }
        } else {
            ApiError::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl {
            message: err.to_string(),
        }
    }
}
