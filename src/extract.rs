//! Core extraction algorithm.
//!
//! Turns a loaded page into an [`ExtractionResult`]: detach a copy of the
//! body, prune boilerplate, render layout-aware text, normalize white space
//! and bound the length. Every failure is returned as a value; nothing here
//! panics on page content or hands an `Err` to the caller.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::{ErrorCode, Result};
use crate::options::Options;
use crate::page::{is_pdf, Page};
use crate::patterns::normalize_whitespace;
use crate::result::ExtractionResult;
use crate::selector::boilerplate;

/// Run the extractor against `page`.
pub(crate) fn extract_page<P: Page + ?Sized>(page: &P, options: &Options) -> ExtractionResult {
    if !page.has_body() {
        debug!("page has no body element");
        return ExtractionResult::failure(ErrorCode::NoBodyElement, false);
    }

    let is_pdf = is_pdf(page.content_type(), page.url());

    // A panic inside the page adapter or parser is a fault like any other.
    match panic::catch_unwind(AssertUnwindSafe(|| clean_text(page, options))) {
        Ok(Ok(text)) => finish(text, is_pdf, options),
        Ok(Err(err)) => {
            warn!(error = %err, is_pdf, "extraction failed");
            ExtractionResult::failure(ErrorCode::ExtractionFailed, is_pdf)
        }
        Err(_) => {
            warn!(is_pdf, "extraction panicked");
            ExtractionResult::failure(ErrorCode::ExtractionFailed, is_pdf)
        }
    }
}

/// Detached, pruned, rendered and normalized body text.
fn clean_text<P: Page + ?Sized>(page: &P, options: &Options) -> Result<String> {
    let mut body = page.detach_body(options)?;
    let removed = boilerplate::prune(&mut body);
    let text = normalize_whitespace(&body.rendered_text());
    debug!(removed, bytes = text.len(), "rendered body text");
    Ok(text)
}

/// Apply the minimum and maximum character budgets.
fn finish(text: String, is_pdf: bool, options: &Options) -> ExtractionResult {
    let char_count = text.chars().count();
    if text.is_empty() || char_count < options.min_chars {
        debug!(char_count, min = options.min_chars, "not enough text");
        return ExtractionResult::failure(ErrorCode::NoExtractableText, is_pdf);
    }

    let (text, truncated) = truncate_chars(text, options.char_budget());
    debug!(char_count, truncated, is_pdf, "extraction succeeded");
    ExtractionResult::success(text, truncated, is_pdf)
}

/// Keep at most `max` characters of `text`. Returns whether anything was cut.
pub(crate) fn truncate_chars(mut text: String, max: usize) -> (String, bool) {
    match text.char_indices().nth(max) {
        Some((cut, _)) => {
            text.truncate(cut);
            (text, true)
        }
        None => (text, false),
    }
}
