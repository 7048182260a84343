//! # docmind-extract
//!
//! Bounded, boilerplate-free text extraction from a loaded web page, the
//! query service that sends that text to a language model, and the popup
//! session that drives both.
//!
//! The extractor copies the page body, strips navigation, headers, footers,
//! sidebars, ads, cookie banners and non-content tags, renders the remaining
//! text the way a browser lays it out, collapses white space and bounds the
//! result to 30,000 characters. It never modifies the page and never fails
//! with a panic or an `Err`: every outcome is an [`ExtractionResult`].
//!
//! ## Quick Start
//!
//! ```rust
//! use docmind_extract::{extract_html, ErrorCode};
//!
//! let html = r#"<html><body>
//!   <nav>Home | Blog | About | Contact</nav>
//!   <main><p>Rust is a systems programming language focused on safety,
//!   speed and concurrency. It accomplishes these goals without a garbage
//!   collector.</p></main>
//! </body></html>"#;
//!
//! let result = extract_html(html, Some("https://example.com/rust"), None);
//! assert!(result.is_success());
//! assert!(result.text().starts_with("Rust is a systems"));
//! assert!(!result.text().contains("Home"));
//!
//! let empty = extract_html("<body><p>Too short.</p></body>", None, None);
//! assert_eq!(empty.error(), Some(ErrorCode::NoExtractableText));
//! ```
//!
//! ## Pages
//!
//! The extractor reads pages through the [`Page`] trait. [`HtmlPage`] parses
//! HTML; [`SyntheticPage`] wraps a [`tree::Element`] built in memory.

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// DOM adapter: HTML parsing and detached copies of the body.
pub mod dom;

/// Detached element tree and layout-aware text rendering.
pub mod tree;

/// The `Page` abstraction, HTML and synthetic pages, PDF detection.
pub mod page;

/// Simple selectors and the boilerplate denylist.
pub mod selector;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Query validation, prompt templates and the model call.
pub mod query;

/// Popup session state, query service client and status text.
pub mod popup;

// Public API - re-exports
pub use error::{Error, ErrorCode, Result};
pub use options::{Options, MAX_CHARS, MIN_CHARS};
pub use page::{HtmlPage, Page, SyntheticPage};
pub use patterns::normalize_whitespace;
pub use result::ExtractionResult;

/// Extract text from `page` using default options.
///
/// # Example
///
/// ```rust
/// use docmind_extract::{extract, SyntheticPage, ErrorCode};
///
/// let result = extract(&SyntheticPage::without_body());
/// assert_eq!(result.error(), Some(ErrorCode::NoBodyElement));
/// ```
#[must_use]
pub fn extract<P: Page + ?Sized>(page: &P) -> ExtractionResult {
    extract_with_options(page, &Options::default())
}

/// Extract text from `page` with custom budgets and limits.
///
/// # Example
///
/// ```rust
/// use docmind_extract::{extract_with_options, HtmlPage, Options};
///
/// let page = HtmlPage::parse(&format!("<body><p>{}</p></body>", "word ".repeat(100)));
/// let options = Options {
///     max_chars: 50,
///     ..Options::default()
/// };
/// let result = extract_with_options(&page, &options);
/// assert!(result.truncated());
/// assert_eq!(result.char_count(), 50);
/// ```
#[must_use]
pub fn extract_with_options<P: Page + ?Sized>(page: &P, options: &Options) -> ExtractionResult {
    extract::extract_page(page, options)
}

/// Parse `html` and extract its text.
///
/// `url` and `content_type` feed PDF detection.
#[must_use]
pub fn extract_html(html: &str, url: Option<&str>, content_type: Option<&str>) -> ExtractionResult {
    let mut page = HtmlPage::parse(html);
    if let Some(url) = url {
        page = page.with_url(url);
    }
    if let Some(ct) = content_type {
        page = page.with_content_type(ct);
    }
    extract(&page)
}
