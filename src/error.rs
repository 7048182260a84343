//! Error types for docmind-extract.
//!
//! Two layers live here:
//!
//! - [`ErrorCode`]: the closed set of codes that cross component boundaries
//!   (extraction results, query service replies). Its `Display` is the
//!   user-facing message for the code.
//! - [`Error`]: internal faults raised while building the detached copy of a
//!   page. The extractor never returns these; it folds them into
//!   [`ErrorCode::ExtractionFailed`].

use serde::{Deserialize, Serialize};

/// Error codes exchanged between the extractor, the relay and the query service.
///
/// Only [`NoBodyElement`](Self::NoBodyElement),
/// [`NoExtractableText`](Self::NoExtractableText) and
/// [`ExtractionFailed`](Self::ExtractionFailed) originate from extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Cleaned page text was empty or below the minimum length.
    #[error("No readable text found on this page. If this is a PDF, it may be scanned or image-based (OCR not supported).")]
    NoExtractableText,

    /// The page has no body element yet.
    #[error("The page isn't fully loaded yet. Try refreshing and opening DocMind again.")]
    NoBodyElement,

    /// The host refused access to the page (internal or store pages).
    #[error("DocMind cannot access this page. The browser restricts extensions on internal pages and the Web Store.")]
    CannotAccessPage,

    /// An unexpected fault while reading the page.
    #[error("Something went wrong while reading the page. Please refresh and try again.")]
    ExtractionFailed,

    /// The query service rejected the text (or question) as too short.
    #[error("Not enough text to analyze. The page needs at least 100 characters of content.")]
    InsufficientText,

    /// The model provider answered with HTTP 429.
    #[error("Too many requests. Please wait 30 seconds and try again.")]
    RateLimited,

    /// Any other model provider or server failure.
    #[error("Could not reach the AI service. Please check your connection and try again.")]
    ApiError,

    #[error("Network error. Please check your internet connection and try again.")]
    NetworkError,

    #[error("Got an unexpected response from the AI. Please try again.")]
    UnexpectedResponse,

    #[error("Request timed out. The page may be too long or the AI is busy. Please try again.")]
    Timeout,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::NoExtractableText,
        Self::NoBodyElement,
        Self::CannotAccessPage,
        Self::ExtractionFailed,
        Self::InsufficientText,
        Self::RateLimited,
        Self::ApiError,
        Self::NetworkError,
        Self::UnexpectedResponse,
        Self::Timeout,
    ];

    /// Wire name of the code, e.g. `"NO_BODY_ELEMENT"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoExtractableText => "NO_EXTRACTABLE_TEXT",
            Self::NoBodyElement => "NO_BODY_ELEMENT",
            Self::CannotAccessPage => "CANNOT_ACCESS_PAGE",
            Self::ExtractionFailed => "EXTRACTION_FAILED",
            Self::InsufficientText => "INSUFFICIENT_TEXT",
            Self::RateLimited => "RATE_LIMITED",
            Self::ApiError => "API_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::UnexpectedResponse => "UNEXPECTED_RESPONSE",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    #[must_use]
    pub fn from_wire(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Whether the extractor itself may produce this code.
    #[must_use]
    pub const fn is_extraction_code(self) -> bool {
        matches!(
            self,
            Self::NoBodyElement | Self::NoExtractableText | Self::ExtractionFailed
        )
    }

    /// User-facing message for this code.
    #[must_use]
    pub fn user_message(self) -> String {
        self.to_string()
    }
}

/// Internal fault while copying or reading a page.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The body subtree nests deeper than the configured limit.
    #[error("document nesting exceeds {limit} levels")]
    DepthLimit { limit: usize },

    /// The body subtree holds more nodes than the configured limit.
    #[error("document exceeds {limit} nodes")]
    NodeLimit { limit: usize },

    /// A body was reported present but could not be located when copying.
    #[error("body element disappeared while copying")]
    MissingBody,
}

/// Result type alias for internal operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wire_names_match_serde() {
        for code in ErrorCode::ALL {
            let json = serde_json::to_string(&code).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(ErrorCode::from_wire(code.as_str()), Some(code));
        }
    }

    #[test]
    fn unknown_wire_name_is_none() {
        assert_eq!(ErrorCode::from_wire("SOMETHING_ELSE"), None);
        assert_eq!(ErrorCode::from_wire("no_body_element"), None);
    }

    #[test]
    fn every_code_has_distinct_message() {
        let messages: HashSet<String> = ErrorCode::ALL.iter().map(|c| c.user_message()).collect();
        assert_eq!(messages.len(), ErrorCode::ALL.len());
        assert!(messages.iter().all(|m| !m.is_empty()));
    }

    #[test]
    fn only_three_codes_come_from_extraction() {
        let count = ErrorCode::ALL.iter().filter(|c| c.is_extraction_code()).count();
        assert_eq!(count, 3);
        assert!(ErrorCode::NoBodyElement.is_extraction_code());
        assert!(!ErrorCode::CannotAccessPage.is_extraction_code());
    }

    #[test]
    fn internal_error_display() {
        let err = Error::DepthLimit { limit: 8 };
        assert_eq!(err.to_string(), "document nesting exceeds 8 levels");
    }
}
