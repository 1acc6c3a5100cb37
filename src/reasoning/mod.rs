//! Reasoning-service boundary.
//!
//! The reasoning service is a black-box text-completion backend reached
//! over HTTP. Everything behind the `ReasoningBackend` trait is
//! replaceable; the reranker only sees `complete(system, prompt) -> text`.

pub mod parser;
pub mod prompt;
pub mod reranker;

use serde::{Deserialize, Serialize};

pub use reranker::ReasoningReranker;

#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    #[error("reasoning service not configured")]
    NotConfigured,
    #[error("cannot reach reasoning service at {0}")]
    Connection(String),
    #[error("reasoning request timed out after {0}s")]
    Timeout(u64),
    #[error("reasoning service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("cannot parse reasoning service response: {0}")]
    ResponseParsing(String),
}

/// Black-box text-completion backend.
#[async_trait::async_trait]
pub trait ReasoningBackend: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasoningError>;

    /// Model identifier for logs and the health endpoint.
    fn model(&self) -> &str;
}

/// Request body for the generate endpoint.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from the generate endpoint.
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for an Ollama-compatible completion service.
pub struct HttpReasoningClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpReasoningClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, ReasoningError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ReasoningError::Connection(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl ReasoningBackend for HttpReasoningClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasoningError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                ReasoningError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ReasoningError::Timeout(self.timeout_secs)
            } else {
                ReasoningError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReasoningError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Mock backend for tests — returns a configured response or failure.
pub struct MockReasoningBackend {
    outcome: Result<String, MockFailure>,
}

#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    Unreachable,
    Timeout,
}

impl MockReasoningBackend {
    pub fn with_response(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            outcome: Err(MockFailure::Unreachable),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            outcome: Err(MockFailure::Timeout),
        }
    }
}

#[async_trait::async_trait]
impl ReasoningBackend for MockReasoningBackend {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ReasoningError> {
        match &self.outcome {
            Ok(text) => Ok(text.clone()),
            Err(MockFailure::Unreachable) => {
                Err(ReasoningError::Connection("http://mock".to_string()))
            }
            Err(MockFailure::Timeout) => Err(ReasoningError::Timeout(0)),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
