//! HTTP client trait and implementations.
//!
//! Extraction and every provider adapter talk to the network through
//! [`HttpClient`], so tests can swap in [`MockClient`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::HttpError;

/// Browser-like user agent; several sites refuse obvious bots.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and body of a completed request. Non-2xx statuses are not errors here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;

    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError>;
}

pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Mock response for testing.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Status(u16, String),
    Error(HttpError),
}

/// A request seen by [`MockClient`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

/// Mock HTTP client for testing.
///
/// Serves canned responses by exact URL and records every request it receives.
/// URLs without a registered response fail with a request error unless a
/// fallback response was set.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
    fallback: Option<MockResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_status(self, url: &str, status: u16, body: &str) -> Self {
        self.with_response(url, MockResponse::Status(status, body.to_string()))
    }

    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_status(url, 200, html)
    }

    pub fn with_error(self, url: &str, error: HttpError) -> Self {
        self.with_response(url, MockResponse::Error(error))
    }

    /// Response for any URL without its own entry.
    pub fn with_fallback(mut self, response: MockResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn respond(
        &self,
        method: &'static str,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpResponse, HttpError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                method,
                url: url.to_string(),
                body: body.cloned(),
            });
        }

        match self.responses.get(url).or(self.fallback.as_ref()) {
            Some(MockResponse::Status(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(MockResponse::Error(e)) => Err(e.clone()),
            None => Err(HttpError::RequestFailed(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.respond("GET", url, None)
    }

    async fn post_json(
        &self,
        url: &str,
        _headers: &[(&str, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        self.respond("POST", url, Some(body))
    }
}
