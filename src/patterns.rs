//! Compiled regex patterns.
//!
//! Patterns are compiled once on first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Any run of browser white space: the ECMAScript `WhiteSpace` and
/// `LineTerminator` sets. Unlike the regex crate's `\s` this includes U+FEFF
/// and excludes U+0085 (NEL).
pub static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\t\n\x0B\x0C\r \x{00A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]+",
    )
    .expect("WHITESPACE_RUN regex")
});

/// Inline `display: none` in a `style` attribute.
pub static DISPLAY_NONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*display\s*:\s*none\s*(?:!important\s*)?(?:;|$)")
        .expect("DISPLAY_NONE regex")
});

/// Collapse every white-space run to one ASCII space and trim the ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim_matches(' ').to_string()
}
