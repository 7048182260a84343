//! Model request and response shapes (Anthropic Messages API).
//!
//! [`ModelClient`](super::client::ModelClient) sends these over HTTP.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::prompt::SYSTEM_PROMPT;
use super::{PreparedQuery, QueryError};
use crate::error::ErrorCode;

/// Provider base URL; the Messages API lives under `/v1/messages`.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
/// Messages API endpoint.
pub const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "DOCMIND_MODEL";

/// Model settings for the query service.
#[derive(Clone, PartialEq)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ModelConfig {
    /// Defaults with the given key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Read `ANTHROPIC_API_KEY` and optional `DOCMIND_MODEL`.
    ///
    /// # Errors
    ///
    /// `API_ERROR` ("Server configuration error") when the key is unset or empty.
    pub fn from_env() -> Result<Self, QueryError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// `API_ERROR` when the key is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QueryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                tracing::error!("{API_KEY_ENV} not configured");
                QueryError::with_message(ErrorCode::ApiError, "Server configuration error")
            })?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        Ok(config)
    }

    /// HTTP headers for a Messages API call.
    #[must_use]
    pub fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("content-type", "application/json"),
        ]
    }
}

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Messages API request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

impl MessagesRequest {
    #[must_use]
    pub fn new(config: &ModelConfig, query: &PreparedQuery) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: query.prompt.clone(),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// The first text block of a Messages API response.
///
/// # Errors
///
/// `UNEXPECTED_RESPONSE` when the body does not parse or holds no text block.
pub fn answer_from_response(json: serde_json::Value) -> Result<String, QueryError> {
    let response: MessagesResponse = serde_json::from_value(json).map_err(|e| {
        tracing::warn!(error = %e, "unparseable model response");
        QueryError::new(ErrorCode::UnexpectedResponse)
    })?;

    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .ok_or_else(|| QueryError::new(ErrorCode::UnexpectedResponse))
}

/// Map a failed provider call to the service's error body.
///
/// 429 becomes `RATE_LIMITED` without detail; anything else is `API_ERROR`
/// carrying the provider's message.
#[must_use]
pub fn error_for_status(status: u16, message: Option<String>) -> QueryError {
    if status == 429 {
        return QueryError::new(ErrorCode::RateLimited);
    }
    QueryError {
        error: ErrorCode::ApiError,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{prepare, Action, QueryRequest};
    use serde_json::json;

    fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_config_requires_key() {
        let err = ModelConfig::from_lookup(lookup(&[])).err();
        assert_eq!(
            err,
            Some(QueryError::with_message(ErrorCode::ApiError, "Server configuration error"))
        );
        assert!(ModelConfig::from_lookup(lookup(&[(API_KEY_ENV, " ")])).is_err());
    }

    #[test]
    fn test_config_model_override() {
        let config = ModelConfig::from_lookup(lookup(&[(API_KEY_ENV, "k"), (MODEL_ENV, "m-1")]));
        assert_eq!(config.as_ref().map(|c| c.model.as_str()).ok(), Some("m-1"));
        let config = ModelConfig::from_lookup(lookup(&[(API_KEY_ENV, "k")]));
        assert_eq!(config.map(|c| c.model).ok(), Some(DEFAULT_MODEL.to_string()));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", ModelConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
    }

    #[test]
    fn test_request_body() {
        let request = QueryRequest::new("a".repeat(120), Action::Eli5);
        let prepared = prepare(&request).ok();
        assert!(prepared.is_some());
        let Some(prepared) = prepared else { return };

        let body = serde_json::to_value(MessagesRequest::new(&ModelConfig::new("k"), &prepared))
            .unwrap_or_default();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["system"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], prepared.prompt.as_str());
        assert!(body["temperature"].as_f64().is_some_and(|t| (t - 0.3).abs() < 1e-6));
    }

    #[test]
    fn test_answer_from_first_text_block() {
        let response = json!({
            "id": "msg_1",
            "content": [
                {"type": "tool_use", "id": "t", "name": "x", "input": {}},
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]
        });
        assert_eq!(answer_from_response(response), Ok("first".to_string()));
    }

    #[test]
    fn test_answer_missing_text_block() {
        let err = answer_from_response(json!({"content": []})).err().map(|e| e.error);
        assert_eq!(err, Some(ErrorCode::UnexpectedResponse));
        let err = answer_from_response(json!("nonsense")).err().map(|e| e.error);
        assert_eq!(err, Some(ErrorCode::UnexpectedResponse));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(error_for_status(429, Some("slow down".into())), QueryError::new(ErrorCode::RateLimited));
        assert_eq!(
            error_for_status(529, Some("overloaded".into())),
            QueryError::with_message(ErrorCode::ApiError, "overloaded")
        );
        assert_eq!(error_for_status(500, None), QueryError::new(ErrorCode::ApiError));
    }

    #[test]
    fn test_headers() {
        let config = ModelConfig::new("k");
        let headers = config.headers();
        assert!(headers.contains(&("x-api-key", "k")));
        assert!(headers.contains(&("anthropic-version", ANTHROPIC_VERSION)));
    }
}
