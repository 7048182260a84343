//! Popup-side call to the query service.

use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::error::ErrorCode;
use crate::query::{interpret_reply, QueryRequest};

/// Query service used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/query";

/// Environment variable overriding the query service endpoint.
pub const ENDPOINT_ENV: &str = "DOCMIND_API_URL";

/// How long the popup waits for an answer before giving up.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the query service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl ServiceClient {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Endpoint from `DOCMIND_API_URL`, else [`DEFAULT_ENDPOINT`].
    #[must_use]
    pub fn from_env() -> Self {
        let endpoint = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self::new(endpoint)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post `request` and return the answer.
    ///
    /// # Errors
    ///
    /// - `TIMEOUT` when no full reply arrives within the timeout
    /// - `NETWORK_ERROR` when the service cannot be reached
    /// - otherwise whatever [`interpret_reply`] makes of the reply
    pub async fn fetch_answer(&self, request: &QueryRequest) -> Result<String, ErrorCode> {
        if let Ok(result) = tokio::time::timeout(self.timeout, self.post(request)).await {
            result
        } else {
            warn!(timeout_ms = self.timeout.as_millis(), "query service timed out");
            Err(ErrorCode::Timeout)
        }
    }

    async fn post(&self, request: &QueryRequest) -> Result<String, ErrorCode> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint = %self.endpoint, "query service unreachable");
                if e.is_timeout() {
                    ErrorCode::Timeout
                } else {
                    ErrorCode::NetworkError
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        interpret_reply(status, &body)
    }
}
