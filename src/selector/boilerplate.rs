//! Boilerplate Denylist
//!
//! Page chrome removed before text is rendered: landmark tags, landmark
//! roles, conventional navigation/header/footer/sidebar/ad classes, cookie
//! banners, and non-content tags.
//!
//! The list is fixed. It favors never stripping main content over catching
//! every piece of chrome.

use tracing::trace;

use super::{matches_any, Selector};
use crate::tree::Element;

/// Selectors whose matches are removed from the detached body.
pub static BOILERPLATE_SELECTORS: &[Selector] = &[
    // Landmark tags
    Selector::Tag("nav"),
    Selector::Tag("header"),
    Selector::Tag("footer"),
    Selector::Tag("aside"),
    // Landmark roles
    Selector::Role("navigation"),
    Selector::Role("banner"),
    Selector::Role("contentinfo"),
    // Class conventions
    Selector::Class("nav"),
    Selector::Class("navbar"),
    Selector::Class("header"),
    Selector::Class("footer"),
    Selector::Class("sidebar"),
    Selector::Class("advertisement"),
    Selector::Class("ad"),
    Selector::Class("ads"),
    Selector::ClassContains("cookie"),
    // Non-content tags
    Selector::Tag("script"),
    Selector::Tag("style"),
    Selector::Tag("noscript"),
    Selector::Tag("iframe"),
];

/// Whether `el` is boilerplate.
#[must_use]
pub fn is_boilerplate(el: &Element) -> bool {
    matches_any(BOILERPLATE_SELECTORS, el)
}

/// Remove every boilerplate descendant of `root`. Returns how many subtrees
/// were removed.
pub fn prune(root: &mut Element) -> usize {
    let removed = root.remove_descendants(is_boilerplate);
    trace!(removed, "pruned boilerplate");
    removed
}
