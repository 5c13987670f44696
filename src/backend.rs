// HTTP client for the coaching backend.
//
// The session talks to the backend through the `Backend` trait so tests can
// drive it with an in-memory double; `HttpBackend` is the reqwest
// implementation used by the binary.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::protocol::{ChatRequest, ChatResponse, StateResponse};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {0}")]
    Status(StatusCode),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The four backend endpoints.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /chat`.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;

    /// `POST /reset`.
    async fn reset(&self) -> Result<(), BackendError>;

    /// `GET /state`.
    async fn fetch_state(&self) -> Result<StateResponse, BackendError>;

    /// `POST /shutdown`. The backend may exit before answering.
    async fn shutdown(&self) -> Result<(), BackendError>;
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client with the configured request timeout.
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::new(http, &config.base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let response = self.http.post(self.url("/chat")).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // The backend reports solver failures as JSON with an error status;
        // any decodable body is passed on.
        match serde_json::from_slice::<ChatResponse>(&body) {
            Ok(parsed) => {
                if !status.is_success() {
                    debug!("Chat returned {} with a JSON body", status);
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(BackendError::Status(status)),
            Err(e) => Err(BackendError::Decode(e)),
        }
    }

    async fn reset(&self) -> Result<(), BackendError> {
        let response = self.http.post(self.url("/reset")).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Reset rejected with status {}", status);
            return Err(BackendError::Status(status));
        }
        Ok(())
    }

    async fn fetch_state(&self) -> Result<StateResponse, BackendError> {
        let response = self.http.get(self.url("/state")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn shutdown(&self) -> Result<(), BackendError> {
        let response = self.http.post(self.url("/shutdown")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
