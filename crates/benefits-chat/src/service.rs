//! Client for the external benefits analysis service.
//!
//! The service runs the multi-agent pipeline (manager, eligibility,
//! wellness, policy) and answers one query per call:
//!
//! ```text
//! POST {base_url}/manager/analyze
//!   { "employee_id": "...", "query": "..." }
//! 200
//!   { "response": { "message": "...", "details": {...} },
//!     "next_steps": [...], "debug_info": [...] }
//! non-2xx
//!   { "detail": "..." }
//! ```
//!
//! `GET {base_url}/` returns a small health document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use benefits_core::models::analysis::{AnalyzeRequest, AnalyzeResponse, ErrorBody, HealthStatus};

use crate::error::AnalysisError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest slice of a non-JSON error body kept in [`AnalysisError::Status`].
const MAX_DETAIL_CHARS: usize = 200;

#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError>;
}

pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AnalysisError::Config("analysis base URL is empty".to_string()));
        }

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the service's health document.
    pub async fn health(&self) -> Result<HealthStatus, AnalysisError> {
        let url = format!("{}/", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(resp).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, AnalysisError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => err.detail,
                Err(_) => body.chars().take(MAX_DETAIL_CHARS).collect(),
            };
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|e| AnalysisError::Malformed(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout(self.timeout)
        } else {
            AnalysisError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        let url = format!("{}/manager/analyze", self.base_url);
        debug!(employee_id = %request.employee_id, url = %url, "posting analysis request");

        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.decode(resp).await
    }
}
