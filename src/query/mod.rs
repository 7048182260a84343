//! Query preparation.
//!
//! The server-side half of the document Q&A flow: validate a
//! [`QueryRequest`], re-bound its text, pick the prompt template for its
//! [`Action`], send it with [`ModelClient`], and turn the model's reply (or
//! failure) into the wire shapes the popup understands.
//!
//! ```rust
//! use docmind_extract::query::{prepare, Action, QueryRequest};
//!
//! let request = QueryRequest {
//!     text: "word ".repeat(40),
//!     question: None,
//!     action: Some("summarize".to_string()),
//! };
//! let prepared = prepare(&request)?;
//! assert_eq!(prepared.action, Action::Summarize);
//! assert!(prepared.prompt.starts_with("<document>\n"));
//! # Ok::<(), docmind_extract::query::QueryError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ErrorCode;
use crate::extract::truncate_chars;
use crate::options::{MAX_CHARS, MIN_CHARS};

pub mod client;
pub mod model;
pub mod prompt;
pub mod reply;

pub use client::ModelClient;
pub use model::{answer_from_response, error_for_status, MessagesRequest, ModelConfig};
pub use prompt::{build_prompt, NO_ANSWER, SYSTEM_PROMPT};
pub use reply::interpret_reply;

/// What the user asked the model to do with the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Free-text question about the page.
    #[default]
    Ask,
    Summarize,
    Takeaways,
    /// Explain like I'm five.
    Eli5,
    Arguments,
}

impl Action {
    pub const ALL: [Self; 5] = [
        Self::Ask,
        Self::Summarize,
        Self::Takeaways,
        Self::Eli5,
        Self::Arguments,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::Summarize => "summarize",
            Self::Takeaways => "takeaways",
            Self::Eli5 => "eli5",
            Self::Arguments => "arguments",
        }
    }

    /// Button label shown for the canned actions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ask => "Ask",
            Self::Summarize => "Summarize",
            Self::Takeaways => "Key Takeaways",
            Self::Eli5 => "ELI5",
            Self::Arguments => "Main Arguments",
        }
    }

    /// Parse a requested action; missing or unknown names mean [`Action::Ask`].
    #[must_use]
    pub fn parse_or_ask(raw: Option<&str>) -> Self {
        raw.and_then(|r| r.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// An action name outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

/// Body of a query service request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Page text, usually an extraction result's `text`.
    #[serde(default)]
    pub text: String,

    /// Required for `ask`, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Action name; kept raw so unknown names can fall back to `ask`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl QueryRequest {
    /// Request for `action` over `text`.
    #[must_use]
    pub fn new(text: impl Into<String>, action: Action) -> Self {
        Self {
            text: text.into(),
            question: None,
            action: Some(action.as_str().to_string()),
        }
    }

    #[must_use]
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }
}

/// A validated request, ready to send to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    pub action: Action,
    /// User turn: the document block plus the action's instruction.
    pub prompt: String,
    /// Whether the request text was cut to the character budget.
    pub truncated: bool,
}

/// Error body returned by the query service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}{detail}", code = .error.as_str(), detail = .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct QueryError {
    pub error: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QueryError {
    #[must_use]
    pub fn new(error: ErrorCode) -> Self {
        Self {
            error,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(error: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error,
            message: Some(message.into()),
        }
    }

    /// HTTP status the query service answers this error with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self.error {
            ErrorCode::InsufficientText => 400,
            ErrorCode::RateLimited => 429,
            _ => 500,
        }
    }
}

/// Reply body of the query service: an answer or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryReply {
    Answer { answer: String },
    Error(QueryError),
}

impl QueryReply {
    /// HTTP status for this reply.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Answer { .. } => 200,
            Self::Error(err) => err.status(),
        }
    }
}

impl From<Result<String, QueryError>> for QueryReply {
    fn from(result: Result<String, QueryError>) -> Self {
        match result {
            Ok(answer) => Self::Answer { answer },
            Err(err) => Self::Error(err),
        }
    }
}

/// Validate `request` and build its prompt.
///
/// # Errors
///
/// `INSUFFICIENT_TEXT` when the text is shorter than 100 characters, or when
/// the action is `ask` and the question is missing or blank.
pub fn prepare(request: &QueryRequest) -> Result<PreparedQuery, QueryError> {
    if request.text.chars().count() < MIN_CHARS {
        return Err(QueryError::new(ErrorCode::InsufficientText));
    }

    let (text, truncated) = truncate_chars(request.text.clone(), MAX_CHARS);
    let action = Action::parse_or_ask(request.action.as_deref());

    let question = request.question.as_deref().filter(|q| !q.trim().is_empty());
    if action == Action::Ask && question.is_none() {
        return Err(QueryError::with_message(
            ErrorCode::InsufficientText,
            "Question is required",
        ));
    }

    debug!(%action, truncated, "prepared query");
    Ok(PreparedQuery {
        action,
        prompt: build_prompt(&text, question, action),
        truncated,
    })
}
