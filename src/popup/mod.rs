//! Popup Logic
//!
//! The client half of the Q&A flow, without any rendering: the session
//! state machine ([`Session`]), the call to the query service
//! ([`ServiceClient`]) with its 30-second timeout, and the status and
//! loading text.
//!
//! ```rust
//! use docmind_extract::popup::{Retry, Session, State};
//! use docmind_extract::{ErrorCode, ExtractionResult};
//!
//! let mut session = Session::new();
//! session.start_extraction();
//! session.finish_extraction(&ExtractionResult::failure(ErrorCode::NoBodyElement, false));
//! assert_eq!(session.state().name(), "error");
//!
//! // Nothing was extracted, so retrying means extracting again.
//! assert_eq!(session.retry(), Retry::Extract);
//! assert_eq!(session.state(), &State::Extracting);
//! ```

pub mod api;
pub mod messages;
pub mod session;

pub use api::{ServiceClient, DEFAULT_ENDPOINT, REQUEST_TIMEOUT};
pub use messages::{char_count_message, error_message, status_lines, TRUNCATED_MESSAGE};
pub use session::{Extracted, Failure, Retry, Session, State};
