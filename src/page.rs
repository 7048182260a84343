//! Page abstraction.
//!
//! The extractor reads three things from a page: whether it has a body, its
//! declared content type and its URL; and it asks for a detached copy of the
//! body. [`Page`] captures exactly that, so the algorithm runs the same
//! against parsed HTML ([`HtmlPage`]) and against in-memory trees
//! ([`SyntheticPage`]).

use url::Url;

use crate::dom::{self, Document};
use crate::encoding;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::tree::Element;

/// MIME type reported for PDF documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A loaded page the extractor can read.
pub trait Page {
    /// Whether the document currently has a body element.
    fn has_body(&self) -> bool;

    /// Declared content type, e.g. `text/html` or `application/pdf`.
    fn content_type(&self) -> Option<&str>;

    /// Address of the page (absolute URL or bare path).
    fn url(&self) -> Option<&str>;

    /// Deep copy of the body subtree, detached from the page.
    ///
    /// # Errors
    ///
    /// Fails when the body is gone or the copy exceeds the limits in `options`.
    fn detach_body(&self, options: &Options) -> Result<Element>;
}

/// Whether a page with this content type and URL is a PDF document.
///
/// The content type matches on its MIME essence; the URL matches when its
/// path (query and fragment excluded) ends with the literal `.pdf`.
///
/// ```rust
/// use docmind_extract::page::is_pdf;
///
/// assert!(is_pdf(None, Some("https://example.com/paper.pdf?dl=1")));
/// assert!(is_pdf(Some("application/pdf"), None));
/// assert!(!is_pdf(Some("text/html"), Some("https://example.com/paper.PDF")));
/// ```
#[must_use]
pub fn is_pdf(content_type: Option<&str>, url: Option<&str>) -> bool {
    content_type.is_some_and(|ct| mime_essence(ct) == PDF_CONTENT_TYPE)
        || url.is_some_and(|u| url_path(u).ends_with(".pdf"))
}

fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// A page parsed from HTML.
///
/// ```rust
/// use docmind_extract::{extract, HtmlPage};
///
/// let page = HtmlPage::parse("<html><body><p>Hi</p></body></html>")
///     .with_url("https://example.com/post");
/// let result = extract(&page);
/// assert!(!result.is_success()); // too short
/// ```
pub struct HtmlPage {
    document: Document,
    content_type: Option<String>,
    url: Option<String>,
}

impl HtmlPage {
    /// Parse an HTML string.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            document: dom::parse(html),
            content_type: None,
            url: None,
        }
    }

    /// Decode and parse an HTML payload. `content_type` is the host's
    /// `Content-Type` value; its charset (if any) drives decoding and it is
    /// kept as the page's content type.
    #[must_use]
    pub fn from_bytes(html: &[u8], content_type: Option<&str>) -> Self {
        let decoded = encoding::transcode_to_utf8(html, content_type);
        let page = Self::parse(&decoded);
        match content_type {
            Some(ct) => page.with_content_type(ct),
            None => page,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The underlying parsed document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Page for HtmlPage {
    fn has_body(&self) -> bool {
        dom::body(&self.document).is_some()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn detach_body(&self, options: &Options) -> Result<Element> {
        let body = dom::body(&self.document).ok_or(Error::MissingBody)?;
        dom::detach(&body, options)
    }
}

/// A page backed by an in-memory tree.
#[derive(Debug, Clone, Default)]
pub struct SyntheticPage {
    body: Option<Element>,
    content_type: Option<String>,
    url: Option<String>,
}

impl SyntheticPage {
    #[must_use]
    pub fn new(body: Element) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    /// A page whose body has not been created yet.
    #[must_use]
    pub fn without_body() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn body(&self) -> Option<&Element> {
        self.body.as_ref()
    }
}

impl Page for SyntheticPage {
    fn has_body(&self) -> bool {
        self.body.is_some()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn detach_body(&self, options: &Options) -> Result<Element> {
        let body = self.body.as_ref().ok_or(Error::MissingBody)?;
        let depth = depth_of(body);
        if depth > options.max_depth {
            return Err(Error::DepthLimit {
                limit: options.max_depth,
            });
        }
        if body.node_count() > options.max_nodes {
            return Err(Error::NodeLimit {
                limit: options.max_nodes,
            });
        }
        Ok(body.clone())
    }
}

/// Deepest element nesting below `root` (the root itself is depth 0).
fn depth_of(root: &Element) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(root, 0)];
    while let Some((el, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(el.child_elements().map(|c| (c, depth + 1)));
    }
    deepest
}
