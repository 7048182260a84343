//! Configuration options for page extraction.
//!
//! The `Options` struct carries the character budgets and the resource limits
//! applied while copying a page. The defaults are what the relay and the
//! query service expect; change them only for offline use.

/// Minimum number of characters a page must yield to count as extractable.
pub const MIN_CHARS: usize = 100;

/// Maximum number of characters handed downstream.
pub const MAX_CHARS: usize = 30_000;

/// Configuration options for page extraction.
///
/// # Example
///
/// ```rust
/// use docmind_extract::Options;
///
/// let options = Options {
///     max_chars: 10_000,
///     ..Options::default()
/// };
/// assert_eq!(options.min_chars, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Cleaned text shorter than this fails with `NO_EXTRACTABLE_TEXT`.
    ///
    /// Default: `100`
    pub min_chars: usize,

    /// Cleaned text longer than this is cut to exactly this many characters.
    /// Values below `min_chars` are raised to `min_chars`, see
    /// [`Options::char_budget`].
    ///
    /// Default: `30_000`
    pub max_chars: usize,

    /// Deepest element nesting copied from the page body.
    ///
    /// Deeper documents fail with `EXTRACTION_FAILED` instead of exhausting
    /// the stack.
    ///
    /// Default: `512`
    pub max_depth: usize,

    /// Largest number of nodes (elements and text) copied from the page body.
    ///
    /// Default: `500_000`
    pub max_nodes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_chars: MIN_CHARS,
            max_chars: MAX_CHARS,
            max_depth: 512,
            max_nodes: 500_000,
        }
    }
}

impl Options {
    /// Ceiling actually applied to the cleaned text.
    ///
    /// Never below `min_chars`, so a successful result always holds at least
    /// `min_chars` characters.
    #[must_use]
    pub fn char_budget(&self) -> usize {
        self.max_chars.max(self.min_chars)
    }
}
