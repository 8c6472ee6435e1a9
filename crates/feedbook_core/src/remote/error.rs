//! Remote client error taxonomy.

use crate::model::resource::ResourceValidationError;
use serde_json::Value;
use thiserror::Error;

const MAX_SERVER_MESSAGE_CHARS: usize = 300;

/// Failure returned by every remote client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally; no request was sent.
    #[error(transparent)]
    Validation(#[from] ResourceValidationError),
    #[error("resource not found: {path}")]
    NotFound { path: String },
    /// Network failure, timeout or undecodable response body.
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server responded with HTTP {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },
}

impl ApiError {
    /// HTTP status carried by the error, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } => Some(*status),
            Self::Validation(_) | Self::Transport(_) => None,
        }
    }

    /// Builds the error for a non-2xx response.
    pub fn from_status(status: u16, path: &str, body: &str) -> Self {
        if status == 404 {
            return Self::NotFound {
                path: path.to_string(),
            };
        }
        Self::Server {
            status,
            message: server_message(body),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Transport(format!("malformed response body: {value}"))
    }
}

/// Extracts a human-readable message from an error response body.
///
/// Prefers a JSON `message` field, then `error`, then the raw text.
pub fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = object.get(key) {
                return Some(message.clone());
            }
        }
    }

    Some(trimmed.chars().take(MAX_SERVER_MESSAGE_CHARS).collect())
}
