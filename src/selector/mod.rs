//! Selector Infrastructure
//!
//! Simple selectors over the detached tree, and the boilerplate denylist
//! built from them. Only the four selector shapes the denylist needs are
//! supported: tag, `[role="..."]`, `.class` and `[class*="..."]`. Matching
//! follows HTML document semantics: tag names are case-insensitive,
//! attribute values and class tokens are case-sensitive.

use std::fmt;

use crate::tree::Element;

pub mod boilerplate;

/// A simple selector tested against one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// `nav`
    Tag(&'static str),
    /// `[role="navigation"]`
    Role(&'static str),
    /// `.sidebar` (whole class token)
    Class(&'static str),
    /// `[class*="cookie"]` (substring of the raw attribute)
    ClassContains(&'static str),
}

impl Selector {
    /// Whether `el` matches this selector.
    #[must_use]
    pub fn matches(&self, el: &Element) -> bool {
        match *self {
            Self::Tag(tag) => el.tag().eq_ignore_ascii_case(tag),
            Self::Role(role) => el.attr("role") == Some(role),
            Self::Class(class) => el.has_class(class),
            Self::ClassContains(needle) => el.attr("class").is_some_and(|c| c.contains(needle)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Role(role) => write!(f, "[role=\"{role}\"]"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::ClassContains(needle) => write!(f, "[class*=\"{needle}\"]"),
        }
    }
}

/// Whether `el` matches any selector in `selectors`.
#[must_use]
pub fn matches_any(selectors: &[Selector], el: &Element) -> bool {
    selectors.iter().any(|s| s.matches(el))
}

/// All descendants of `root` matching `selector`, in document order.
///
/// Like `querySelectorAll`, the root itself is not a candidate.
#[must_use]
pub fn query_all<'a>(root: &'a Element, selector: &Selector) -> Vec<&'a Element> {
    let mut matches = Vec::new();
    let mut stack: Vec<&Element> = root.child_elements().collect();
    stack.reverse();
    while let Some(el) = stack.pop() {
        if selector.matches(el) {
            matches.push(el);
        }
        let mut children: Vec<&Element> = el.child_elements().collect();
        children.reverse();
        stack.extend(children);
    }
    matches
}
