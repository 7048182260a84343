//! Result type for page extraction.
//!
//! [`ExtractionResult`] is the only value the extractor hands to its caller.
//! It is built through [`ExtractionResult::success`] or
//! [`ExtractionResult::failure`], which keep the success/failure invariants
//! in one place, and is read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Outcome of one extraction call.
///
/// Serializes to the relay's wire shape:
///
/// ```json
/// {"success":true,"text":"...","charCount":1234,"truncated":false,"isPDF":false}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    success: bool,
    text: String,
    char_count: usize,
    truncated: bool,
    #[serde(rename = "isPDF")]
    is_pdf: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ErrorCode>,
}

impl ExtractionResult {
    /// Successful extraction. `char_count` is derived from `text`.
    #[must_use]
    pub fn success(text: String, truncated: bool, is_pdf: bool) -> Self {
        let char_count = text.chars().count();
        Self {
            success: true,
            text,
            char_count,
            truncated,
            is_pdf,
            error: None,
        }
    }

    /// Failed extraction: empty text, zero count, not truncated.
    #[must_use]
    pub fn failure(error: ErrorCode, is_pdf: bool) -> Self {
        Self {
            success: false,
            text: String::new(),
            char_count: 0,
            truncated: false,
            is_pdf,
            error: Some(error),
        }
    }

    /// Failure reported by the relay when the page could not be reached at all.
    #[must_use]
    pub fn inaccessible() -> Self {
        Self::failure(ErrorCode::CannotAccessPage, false)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Cleaned page text; empty on failure.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of [`text`](Self::text) in characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Whether the cleaned text was cut to the character budget.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Whether the page looked like a PDF, regardless of success.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.is_pdf
    }

    #[must_use]
    pub fn error(&self) -> Option<ErrorCode> {
        self.error
    }

    /// Consume the result, yielding the text on success or the code on failure.
    ///
    /// # Errors
    ///
    /// Returns the failure's [`ErrorCode`]. A deserialized failure without a
    /// code maps to [`ErrorCode::ExtractionFailed`].
    pub fn into_text(self) -> std::result::Result<String, ErrorCode> {
        if self.success {
            Ok(self.text)
        } else {
            Err(self.error.unwrap_or(ErrorCode::ExtractionFailed))
        }
    }
}
