//! Status line, loading and placeholder text shown by the popup.
//!
//! Error text lives on [`ErrorCode`] itself (its `Display`).

use crate::error::ErrorCode;
use crate::options::MAX_CHARS;
use crate::query::Action;

pub const EXTRACTING_MESSAGE: &str = "Reading page...";
pub const QUERYING_MESSAGE: &str = "Analyzing...";
pub const QUESTION_PLACEHOLDER: &str = "Ask a question about this page...";

/// Shown when the extracted text hit the character budget.
pub const TRUNCATED_MESSAGE: &str =
    "Analyzed 30,000 characters (page was longer; results based on first part)";

/// One-click actions, in button order.
pub const QUICK_ACTIONS: [Action; 4] = [
    Action::Summarize,
    Action::Takeaways,
    Action::Eli5,
    Action::Arguments,
];

/// `"12,345 characters extracted"`.
#[must_use]
pub fn char_count_message(count: usize) -> String {
    format!("{} characters extracted", group_thousands(count))
}

/// User-facing text for an error code.
#[must_use]
pub fn error_message(code: ErrorCode) -> String {
    code.user_message()
}

/// Status lines for an extracted page: the count, then the truncation
/// notice when it applies.
#[must_use]
pub fn status_lines(char_count: usize, truncated: bool) -> Vec<String> {
    let mut lines = vec![char_count_message(char_count)];
    if truncated {
        lines.push(TRUNCATED_MESSAGE.to_string());
    }
    lines
}

/// Decimal digits with a comma every three places (en-US grouping).
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_char_count_message() {
        assert_eq!(char_count_message(12_345), "12,345 characters extracted");
        assert_eq!(char_count_message(100), "100 characters extracted");
    }

    #[test]
    fn test_truncated_notice_names_budget() {
        assert!(TRUNCATED_MESSAGE.contains(&group_thousands(MAX_CHARS)));
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(status_lines(500, false), ["500 characters extracted"]);
        assert_eq!(
            status_lines(MAX_CHARS, true),
            ["30,000 characters extracted", TRUNCATED_MESSAGE]
        );
    }

    #[test]
    fn test_quick_actions_exclude_ask() {
        assert!(!QUICK_ACTIONS.contains(&Action::Ask));
        let labels: Vec<&str> = QUICK_ACTIONS.iter().map(|a| a.label()).collect();
        assert_eq!(labels, ["Summarize", "Key Takeaways", "ELI5", "Main Arguments"]);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(ErrorCode::Timeout),
            "Request timed out. The page may be too long or the AI is busy. Please try again."
        );
    }
}
