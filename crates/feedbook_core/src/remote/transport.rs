//! HTTP transport seam and its reqwest implementation.
//!
//! # Responsibility
//! - Carry one request to the backend and hand back status plus raw body.
//! - Attach caller identity headers and log every request/response.
//!
//! # Invariants
//! - Non-2xx statuses are returned as responses, not errors; only network
//!   failures and timeouts are `ApiError::Transport` here.
//! - Identity travels with each request; the transport keeps no auth state.

use crate::logging::sanitize_message;
use crate::remote::error::ApiError;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Header carrying the acting user's email on mutating requests.
pub const IDENTITY_HEADER: &str = "email";

const MAX_LOGGED_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Acting user for one request, supplied by the session owner.
#[derive(Clone, PartialEq, Eq)]
pub struct Caller {
    /// Sent raw in the `email` header.
    pub email: String,
    /// Session credential, sent as `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
}

impl Caller {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl std::fmt::Debug for Caller {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Caller")
            .field("email", &self.email)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One request against the collection endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the collection root: `/` or `/{id}`.
    pub path: String,
    pub caller: Option<Caller>,
    pub body: Option<Value>,
}

/// Raw backend answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the backend collection endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// reqwest-backed transport bound to one collection base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        if let Some(caller) = request.caller.as_ref() {
            builder = builder.header(IDENTITY_HEADER, caller.email.as_str());
            if let Some(token) = caller.bearer_token.as_deref() {
                builder = builder.bearer_auth(token);
            }
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }
        builder
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let started_at = Instant::now();
        info!(
            "event=http_request module=remote status=start method={} path={}",
            request.method, request.path
        );
        if let Some(body) = request.body.as_ref() {
            debug!(
                "event=http_request module=remote method={} path={} body={}",
                request.method,
                request.path,
                sanitize_message(&body.to_string(), MAX_LOGGED_BODY_CHARS)
            );
        }

        let outcome = async {
            let response = self.build(&request).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(ApiResponse { status, body })
        }
        .await;

        match outcome {
            Ok(response) => {
                info!(
                    "event=http_response module=remote status={} method={} path={} duration_ms={}",
                    response.status,
                    request.method,
                    request.path,
                    started_at.elapsed().as_millis()
                );
                debug!(
                    "event=http_response module=remote path={} body={}",
                    request.path,
                    sanitize_message(&response.body, MAX_LOGGED_BODY_CHARS)
                );
                Ok(response)
            }
            Err(err) => {
                warn!(
                    "event=http_response module=remote status=error method={} path={} duration_ms={} timeout={} error={err}",
                    request.method,
                    request.path,
                    started_at.elapsed().as_millis(),
                    err.is_timeout()
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display_uses_http_verbs() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn caller_debug_redacts_token() {
        let caller = Caller::new("admin@x.com").with_bearer_token("secret-token");
        let debug = format!("{caller:?}");
        assert!(debug.contains("admin@x.com"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn transport_trims_trailing_slash_from_base_url() {
        let transport =
            ReqwestTransport::new("http://localhost:8080/api/feedbacks/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080/api/feedbacks");
    }

    #[test]
    fn build_attaches_identity_and_bearer_headers() {
        let transport =
            ReqwestTransport::new("http://localhost:8080/api/feedbacks", Duration::from_secs(1))
                .unwrap();
        let request = ApiRequest {
            method: HttpMethod::Delete,
            path: "/42".to_string(),
            caller: Some(Caller::new("admin@x.com").with_bearer_token("t0k")),
            body: None,
        };

        let built = transport.build(&request).build().unwrap();
        assert_eq!(built.method(), &reqwest::Method::DELETE);
        assert_eq!(
            built.url().as_str(),
            "http://localhost:8080/api/feedbacks/42"
        );
        assert_eq!(built.headers()[IDENTITY_HEADER], "admin@x.com");
        assert_eq!(built.headers()[reqwest::header::AUTHORIZATION], "Bearer t0k");
    }
}
