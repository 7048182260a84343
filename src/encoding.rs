//! Character encoding detection and transcoding.
//!
//! Pages arrive as bytes together with whatever `Content-Type` the host
//! reported. The charset is taken from that header first, then from the
//! document's own `<meta>` declarations, and defaults to UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// `charset=` parameter of a `Content-Type` value.
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i);\s*charset\s*=\s*["']?([^"';\s]+)"#).expect("valid regex")
});

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s/>]+)"#).expect("valid regex")
});

/// `<meta http-equiv="Content-Type" content="...; charset=...">`
#[allow(clippy::expect_used)]
static META_CONTENT_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#)
        .expect("valid regex")
});

/// How many leading bytes are scanned for `<meta>` declarations.
const SNIFF_LEN: usize = 1024;

/// Detect the encoding of an HTML payload.
///
/// Order: `content_type` header parameter, `<meta http-equiv>`,
/// `<meta charset>`, UTF-8. Unknown labels are skipped.
#[must_use]
pub fn detect_encoding(html: &[u8], content_type: Option<&str>) -> &'static Encoding {
    let from_header = content_type.and_then(|ct| capture(&HEADER_CHARSET_RE, ct));

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    let from_meta = || {
        capture(&META_CONTENT_TYPE_RE, &head).or_else(|| capture(&META_CHARSET_RE, &head))
    };

    from_header
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| from_meta().and_then(|label| Encoding::for_label(label.as_bytes())))
        .unwrap_or(UTF_8)
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode an HTML payload to UTF-8, replacing invalid sequences with U+FFFD.
///
/// # Examples
///
/// ```
/// use docmind_extract::encoding::transcode_to_utf8;
///
/// let html = b"<html><body>Caf\xE9</body></html>";
/// let text = transcode_to_utf8(html, Some("text/html; charset=ISO-8859-1"));
/// assert!(text.contains("Café"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(html, content_type);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }
    let (decoded, _used, _had_errors) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_utf8() {
        assert_eq!(detect_encoding(b"<html><body>x</body></html>", None), UTF_8);
    }

    #[test]
    fn test_meta_charset() {
        let html = br#"<html><head><meta charset="windows-1252"></head></html>"#;
        assert_eq!(detect_encoding(html, None).name(), "windows-1252");
    }

    #[test]
    fn test_meta_http_equiv() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
        assert_eq!(detect_encoding(html, None).name(), "Shift_JIS");
    }

    #[test]
    fn test_header_wins_over_meta() {
        let html = br#"<meta charset="windows-1252">"#;
        let enc = detect_encoding(html, Some("text/html; charset=\"utf-8\""));
        assert_eq!(enc, UTF_8);
    }

    #[test]
    fn test_unknown_header_label_falls_back_to_meta() {
        let html = br#"<meta charset="iso-8859-2">"#;
        let enc = detect_encoding(html, Some("text/html; charset=bogus"));
        assert_eq!(enc.name(), "ISO-8859-2");
    }

    #[test]
    fn test_transcode_latin1() {
        let html = b"<meta charset=\"ISO-8859-1\"><p>Caf\xE9</p>";
        assert!(transcode_to_utf8(html, None).contains("Café"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let text = transcode_to_utf8(b"ok \xFF\xFE ok", None);
        assert!(text.contains('\u{FFFD}'));
        assert!(text.starts_with("ok "));
    }
}
