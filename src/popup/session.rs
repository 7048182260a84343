//! Popup session state machine.
//!
//! ```text
//! Idle -> Extracting -> Extracted -> Querying -> Success
//!              \             ^          |          |
//!               \            |          v          |
//!                `-------> Error <------'   (run another action)
//! ```
//!
//! Transitions are plain methods; the I/O they stand for (asking the relay
//! for an [`ExtractionResult`], calling the query service) is done by the
//! host, or by the helpers [`Session::extract_page`] and
//! [`Session::run_action`].

use tracing::debug;

use super::api::ServiceClient;
use super::messages::{EXTRACTING_MESSAGE, QUERYING_MESSAGE};
use crate::error::ErrorCode;
use crate::page::Page;
use crate::query::{Action, QueryRequest};
use crate::result::ExtractionResult;

/// Text of a successful extraction, carried through the later states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    pub char_count: usize,
    pub truncated: bool,
    pub is_pdf: bool,
}

impl Extracted {
    fn from_result(result: &ExtractionResult) -> Self {
        Self {
            text: result.text().to_string(),
            char_count: result.char_count(),
            truncated: result.truncated(),
            is_pdf: result.is_pdf(),
        }
    }
}

/// A failed step, with whatever is needed to retry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub error: ErrorCode,
    /// Text extracted before the failure, if any.
    pub page: Option<Extracted>,
    pub last_action: Option<Action>,
    pub last_question: Option<String>,
}

impl Failure {
    fn extraction(error: ErrorCode) -> Self {
        Self {
            error,
            page: None,
            last_action: None,
            last_question: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Idle,
    Extracting,
    Extracted(Extracted),
    Querying {
        page: Extracted,
        action: Action,
        question: Option<String>,
    },
    Success {
        page: Extracted,
        action: Action,
        answer: String,
    },
    Error(Failure),
}

impl State {
    /// The extracted page, in every state that has one.
    #[must_use]
    pub fn page(&self) -> Option<&Extracted> {
        match self {
            Self::Extracted(page) | Self::Querying { page, .. } | Self::Success { page, .. } => {
                Some(page)
            }
            Self::Error(failure) => failure.page.as_ref(),
            Self::Idle | Self::Extracting => None,
        }
    }

    /// Spinner text while work is in flight.
    #[must_use]
    pub fn loading_message(&self) -> Option<&'static str> {
        match self {
            Self::Extracting => Some(EXTRACTING_MESSAGE),
            Self::Querying { .. } => Some(QUERYING_MESSAGE),
            _ => None,
        }
    }

    /// Whether an action may be started from this state.
    #[must_use]
    pub fn accepts_action(&self) -> bool {
        matches!(self, Self::Extracted(_) | Self::Success { .. })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Extracted(_) => "extracted",
            Self::Querying { .. } => "querying",
            Self::Success { .. } => "success",
            Self::Error(_) => "error",
        }
    }
}

/// What the host has to do after [`Session::retry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retry {
    /// Send this request again; the session is now querying.
    Query(QueryRequest),
    /// Nothing; the session is back to the extracted page.
    Extracted,
    /// Extract the page again; the session is now extracting.
    Extract,
}

/// One popup session over one page.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: State,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    fn transition(&mut self, next: State) {
        debug!(from = self.state.name(), to = next.name(), "session transition");
        self.state = next;
    }

    pub fn start_extraction(&mut self) {
        self.transition(State::Extracting);
    }

    /// Record the relay's answer. A failed result without a code counts as
    /// `EXTRACTION_FAILED`.
    pub fn finish_extraction(&mut self, result: &ExtractionResult) {
        let next = if result.is_success() {
            State::Extracted(Extracted::from_result(result))
        } else {
            let error = result.error().unwrap_or(ErrorCode::ExtractionFailed);
            State::Error(Failure::extraction(error))
        };
        self.transition(next);
    }

    /// Extraction could not run at all (no page, relay unreachable).
    pub fn fail_extraction(&mut self, error: ErrorCode) {
        self.transition(State::Error(Failure::extraction(error)));
    }

    /// Start `action`. Returns the request to send, or `None` when the
    /// current state does not accept actions.
    pub fn start_query(&mut self, action: Action, question: Option<String>) -> Option<QueryRequest> {
        if !self.state.accepts_action() {
            return None;
        }
        let page = self.state.page()?.clone();
        Some(self.enter_querying(page, action, question))
    }

    fn enter_querying(
        &mut self,
        page: Extracted,
        action: Action,
        question: Option<String>,
    ) -> QueryRequest {
        let mut request = QueryRequest::new(page.text.clone(), action);
        request.question.clone_from(&question);
        self.transition(State::Querying {
            page,
            action,
            question,
        });
        request
    }

    /// Record the query service's answer. Ignored unless querying.
    pub fn finish_query(&mut self, result: Result<String, ErrorCode>) {
        let State::Querying {
            page,
            action,
            question,
        } = &self.state
        else {
            return;
        };

        let next = match result {
            Ok(answer) => State::Success {
                page: page.clone(),
                action: *action,
                answer,
            },
            Err(error) => State::Error(Failure {
                error,
                page: Some(page.clone()),
                last_action: Some(*action),
                last_question: question.clone(),
            }),
        };
        self.transition(next);
    }

    /// Recover from the current state:
    ///
    /// 1. an error with page text and a last action re-runs that action
    /// 2. any other state holding page text returns to `Extracted`
    /// 3. otherwise the page is extracted again
    pub fn retry(&mut self) -> Retry {
        if let State::Error(Failure {
            page: Some(page),
            last_action: Some(action),
            last_question,
            ..
        }) = &self.state
        {
            if !page.text.is_empty() {
                let (page, action, question) = (page.clone(), *action, last_question.clone());
                return Retry::Query(self.enter_querying(page, action, question));
            }
        }

        match self.state.page().filter(|p| !p.text.is_empty()).cloned() {
            Some(page) => {
                self.transition(State::Extracted(page));
                Retry::Extracted
            }
            None => {
                self.start_extraction();
                Retry::Extract
            }
        }
    }

    /// Extract `page` in-process and record the outcome.
    pub fn extract_page<P: Page + ?Sized>(&mut self, page: &P) -> &State {
        self.start_extraction();
        let result = crate::extract(page);
        self.finish_extraction(&result);
        &self.state
    }

    /// Run `action` against the query service and record the outcome.
    /// Does nothing when the current state does not accept actions.
    pub async fn run_action(
        &mut self,
        client: &ServiceClient,
        action: Action,
        question: Option<String>,
    ) -> &State {
        if let Some(request) = self.start_query(action, question) {
            self.send(client, &request).await;
        }
        &self.state
    }

    /// Send a request produced by [`Session::start_query`] or
    /// [`Session::retry`] and record the outcome.
    pub async fn send(&mut self, client: &ServiceClient, request: &QueryRequest) -> &State {
        let result = client.fetch_answer(request).await;
        self.finish_query(result);
        &self.state
    }
}
