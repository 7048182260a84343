//! Query service side of the flow: send a prepared query to the model
//! provider and turn its reply into a [`QueryReply`].
//!
//! ```rust,no_run
//! use docmind_extract::query::{Action, ModelClient, QueryRequest};
//!
//! # async fn run() -> Result<(), docmind_extract::query::QueryError> {
//! let client = ModelClient::from_env()?;
//! let request = QueryRequest::new("word ".repeat(40), Action::Summarize);
//! let reply = client.answer(&request).await;
//! println!("{}", serde_json::to_string(&reply).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::model::{
    answer_from_response, error_for_status, MessagesRequest, ModelConfig, DEFAULT_BASE_URL,
};
use super::{prepare, PreparedQuery, QueryError, QueryReply, QueryRequest};
use crate::error::ErrorCode;

/// HTTP client for the Messages API.
#[derive(Debug, Clone)]
pub struct ModelClient {
    client: Client,
    config: ModelConfig,
    base_url: String,
}

impl ModelClient {
    /// Client for the public provider endpoint.
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Client for another endpoint (a proxy or a local mock).
    #[must_use]
    pub fn with_base_url(config: ModelConfig, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            config,
            base_url,
        }
    }

    /// Client configured from `ANTHROPIC_API_KEY` and `DOCMIND_MODEL`.
    ///
    /// # Errors
    ///
    /// `API_ERROR` ("Server configuration error") when the key is missing.
    pub fn from_env() -> Result<Self, QueryError> {
        ModelConfig::from_env().map(Self::new)
    }

    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    /// Send `query` and return the first text block of the reply.
    ///
    /// # Errors
    ///
    /// - `RATE_LIMITED` when the provider answers 429
    /// - `API_ERROR` for other provider statuses (with the provider's
    ///   message) and for transport failures (without one)
    /// - `UNEXPECTED_RESPONSE` when the reply holds no text block
    pub async fn complete(&self, query: &PreparedQuery) -> Result<String, QueryError> {
        let body = MessagesRequest::new(&self.config, query);

        let mut request = self.client.post(self.messages_url());
        for (name, value) in self.config.headers() {
            request = request.header(name, value);
        }

        let response = request.json(&body).send().await.map_err(|e| {
            warn!(error = %e, "model request failed");
            QueryError::new(ErrorCode::ApiError)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "model provider returned an error");
            return Err(error_for_status(status.as_u16(), provider_message(&text)));
        }

        let json: Value = response.json().await.map_err(|e| {
            warn!(error = %e, "model response body unreadable");
            QueryError::new(ErrorCode::ApiError)
        })?;
        debug!(action = %query.action, "model answered");
        answer_from_response(json)
    }

    /// Validate, send and wrap: the whole query service request handler.
    pub async fn answer(&self, request: &QueryRequest) -> QueryReply {
        let result = match prepare(request) {
            Ok(prepared) => self.complete(&prepared).await,
            Err(err) => Err(err),
        };
        QueryReply::from(result)
    }
}

/// `error.message` of a provider error body, else the raw body.
fn provider_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<Value>(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::model::{ANTHROPIC_VERSION, DEFAULT_MODEL, MESSAGES_URL};
    use crate::query::{Action, NO_ANSWER};
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn page_text() -> String {
        "The harbor was dredged in 1904 to admit larger ships. ".repeat(4)
    }

    fn client(server: &MockServer) -> ModelClient {
        ModelClient::with_base_url(ModelConfig::new("test-key"), format!("{}/", server.uri()))
    }

    #[test]
    fn test_default_url_is_messages_endpoint() {
        let client = ModelClient::new(ModelConfig::new("k"));
        assert_eq!(client.messages_url(), MESSAGES_URL);
    }

    #[test]
    fn test_provider_message() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(provider_message(body), Some("Overloaded".to_string()));
        assert_eq!(provider_message(" Bad gateway "), Some("Bad gateway".to_string()));
        assert_eq!(provider_message(""), None);
    }

    #[tokio::test]
    async fn test_answer_success() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v1/messages"))
            .and(matchers::header("x-api-key", "test-key"))
            .and(matchers::header("anthropic-version", ANTHROPIC_VERSION))
            .and(matchers::body_partial_json(serde_json::json!({
                "model": DEFAULT_MODEL,
                "max_tokens": 1024
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "It was dredged in 1904."}],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = QueryRequest::new(page_text(), Action::Ask).with_question("When?");
        let reply = client(&server).answer(&request).await;
        assert_eq!(
            reply,
            QueryReply::Answer {
                answer: "It was dredged in 1904.".to_string()
            }
        );
        assert_eq!(reply.status(), 200);
    }

    #[tokio::test]
    async fn test_no_answer_passes_through() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "text", "text": NO_ANSWER}]
            })))
            .mount(&server)
            .await;

        let request = QueryRequest::new(page_text(), Action::Ask).with_question("Who won?");
        let reply = client(&server).answer(&request).await;
        assert_eq!(reply, QueryReply::Answer { answer: NO_ANSWER.to_string() });
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string(
                r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#,
            ))
            .mount(&server)
            .await;

        let request = QueryRequest::new(page_text(), Action::Summarize);
        let reply = client(&server).answer(&request).await;
        assert_eq!(reply, QueryReply::Error(QueryError::new(ErrorCode::RateLimited)));
        assert_eq!(reply.status(), 429);
    }

    #[tokio::test]
    async fn test_provider_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string(
                r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
            ))
            .mount(&server)
            .await;

        let request = QueryRequest::new(page_text(), Action::Eli5);
        let reply = client(&server).answer(&request).await;
        assert_eq!(
            reply,
            QueryReply::Error(QueryError::with_message(ErrorCode::ApiError, "Overloaded"))
        );
    }

    #[tokio::test]
    async fn test_missing_text_block() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "tool_use", "id": "t", "name": "x", "input": {}}]
            })))
            .mount(&server)
            .await;

        let request = QueryRequest::new(page_text(), Action::Arguments);
        let reply = client(&server).answer(&request).await;
        assert_eq!(reply, QueryReply::Error(QueryError::new(ErrorCode::UnexpectedResponse)));
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_provider() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let reply = client(&server)
            .answer(&QueryRequest::new("short", Action::Summarize))
            .await;
        assert_eq!(reply, QueryReply::Error(QueryError::new(ErrorCode::InsufficientText)));
        assert_eq!(reply.status(), 400);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_api_error() {
        let client = ModelClient::with_base_url(ModelConfig::new("k"), "http://127.0.0.1:1");
        let reply = client
            .answer(&QueryRequest::new(page_text(), Action::Takeaways))
            .await;
        assert_eq!(reply, QueryReply::Error(QueryError::new(ErrorCode::ApiError)));
    }
}
