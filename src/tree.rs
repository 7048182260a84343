//! Detached element tree.
//!
//! An owned, browser-independent copy of a page subtree. The extractor only
//! ever mutates this copy, never the document it came from. Pages built from
//! HTML produce it through [`crate::dom`]; tests and other hosts can build
//! one directly:
//!
//! ```rust
//! use docmind_extract::tree::Element;
//!
//! let body = Element::new("body")
//!     .with_child(Element::new("nav").with_text("Home About"))
//!     .with_child(Element::new("p").with_text("Hello"))
//!     .with_child(Element::new("p").with_text("world"));
//!
//! assert_eq!(body.rendered_text().split_whitespace().collect::<Vec<_>>(), ["Home", "About", "Hello", "world"]);
//! ```
//!
//! ## Rendered text
//!
//! [`Element::rendered_text`] approximates what a browser lays out rather
//! than the raw character data: block boxes start on a new line, `<br>`
//! breaks the line, table cells are tab separated, and subtrees that are
//! never rendered (`hidden`, inline `display: none`, metadata tags, the
//! body of a closed `<details>`) are skipped. Adjacent inline elements join without a separator.

use crate::patterns::DISPLAY_NONE;

/// Elements laid out as blocks (or block-like boxes such as list items and
/// table rows).
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "center", "dd", "details",
    "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "legend", "li", "listing",
    "main", "menu", "nav", "ol", "p", "plaintext", "pre", "search", "section", "summary",
    "table", "tbody", "tfoot", "thead", "tr", "ul", "xmp", "option", "optgroup",
];

/// Elements whose content never reaches the screen.
const NOT_RENDERED_TAGS: &[&str] = &[
    "base", "datalist", "head", "link", "meta", "param", "script", "source", "style",
    "template", "title", "track",
];

/// A node of the detached tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// Text node.
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text(data.into())
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Node {
    fn from(data: &str) -> Self {
        Self::Text(data.to_string())
    }
}

impl From<String> for Node {
    fn from(data: String) -> Self {
        Self::Text(data)
    }
}

/// An element of the detached tree: lowercase tag, attributes in source
/// order, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// How an element participates in text layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Inline,
    Block,
    Cell,
    LineBreak,
    Hidden,
}

enum Step<'a> {
    Open(&'a Element),
    Text(&'a str),
    Close(&'static str),
}

impl Element {
    /// New empty element. The tag is stored lowercase.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self {
            tag: tag.as_ref().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add (or replace) an attribute. Names are stored lowercase.
    #[must_use]
    pub fn with_attr(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Append a class token to the `class` attribute.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        let value = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", value);
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn set_attr(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value by (case-insensitive) name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Class tokens, split on ASCII white space.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    /// Exact, case-sensitive class token match.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Total number of nodes in this subtree, the element itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            count += 1;
            for child in &el.children {
                match child {
                    Node::Element(e) => stack.push(e),
                    Node::Text(_) => count += 1,
                }
            }
        }
        count
    }

    /// Remove every descendant element for which `remove` returns true,
    /// together with its subtree. The element itself is never tested.
    ///
    /// Returns the number of subtrees removed.
    pub fn remove_descendants<F>(&mut self, mut remove: F) -> usize
    where
        F: FnMut(&Element) -> bool,
    {
        let mut removed = 0;
        let mut stack: Vec<&mut Element> = vec![self];
        while let Some(el) = stack.pop() {
            el.children.retain(|child| match child {
                Node::Element(e) if remove(e) => {
                    removed += 1;
                    false
                }
                _ => true,
            });
            stack.extend(el.children.iter_mut().filter_map(Node::as_element_mut));
        }
        removed
    }

    /// Layout-aware text of this subtree. White space is left as found;
    /// callers normalize it.
    #[must_use]
    pub fn rendered_text(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![Step::Open(self)];

        while let Some(step) = stack.pop() {
            let el = match step {
                Step::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Step::Close(sep) => {
                    out.push_str(sep);
                    continue;
                }
                Step::Open(el) => el,
            };

            match el.layout() {
                Layout::Hidden => continue,
                Layout::LineBreak => {
                    out.push('\n');
                    continue;
                }
                Layout::Block => {
                    out.push('\n');
                    stack.push(Step::Close("\n"));
                }
                Layout::Cell => stack.push(Step::Close("\t")),
                Layout::Inline => {}
            }

            let collapsed = el.is_closed_details();
            for child in el.children.iter().rev() {
                match child {
                    Node::Element(e) if collapsed && e.tag != "summary" => {}
                    Node::Text(_) if collapsed => {}
                    Node::Element(e) => stack.push(Step::Open(e)),
                    Node::Text(t) => stack.push(Step::Text(t)),
                }
            }
        }

        out
    }

    fn layout(&self) -> Layout {
        let tag = self.tag.as_str();
        if NOT_RENDERED_TAGS.contains(&tag) || self.has_attr("hidden") || self.is_display_none() {
            Layout::Hidden
        } else if tag == "br" {
            Layout::LineBreak
        } else if matches!(tag, "td" | "th") {
            Layout::Cell
        } else if BLOCK_TAGS.contains(&tag) {
            Layout::Block
        } else {
            Layout::Inline
        }
    }

    /// A `<details>` without `open` shows only its `<summary>`.
    fn is_closed_details(&self) -> bool {
        self.tag == "details" && !self.has_attr("open")
    }

    fn is_display_none(&self) -> bool {
        self.attr("style").is_some_and(|s| DISPLAY_NONE.is_match(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::normalize_whitespace;

    fn rendered(el: &Element) -> String {
        normalize_whitespace(&el.rendered_text())
    }

    #[test]
    fn test_blocks_are_separated() {
        let body = Element::new("body")
            .with_child(Element::new("p").with_text("first"))
            .with_child(Element::new("p").with_text("second"));
        assert_eq!(rendered(&body), "first second");
    }

    #[test]
    fn test_inline_elements_join() {
        let p = Element::new("p")
            .with_child(Element::new("span").with_text("foo"))
            .with_child(Element::new("b").with_text("bar"));
        assert_eq!(rendered(&p), "foobar");
    }

    #[test]
    fn test_br_and_cells() {
        let body = Element::new("body")
            .with_text("line")
            .with_child(Element::new("br"))
            .with_text("next")
            .with_child(
                Element::new("table").with_child(
                    Element::new("tr")
                        .with_child(Element::new("td").with_text("a"))
                        .with_child(Element::new("td").with_text("b")),
                ),
            );
        let raw = body.rendered_text();
        assert!(raw.contains("line\nnext"));
        assert!(raw.contains("a\tb"));
        assert_eq!(rendered(&body), "line next a b");
    }

    #[test]
    fn test_hidden_subtrees_are_skipped() {
        let body = Element::new("body")
            .with_child(Element::new("div").with_attr("hidden", "").with_text("secret"))
            .with_child(Element::new("div").with_attr("style", "display:none").with_text("gone"))
            .with_child(Element::new("template").with_text("tpl"))
            .with_child(Element::new("div").with_attr("style", "color: red").with_text("shown"));
        assert_eq!(rendered(&body), "shown");
    }

    #[test]
    fn test_closed_details_shows_only_summary() {
        let details = |open: bool| {
            let el = Element::new("details")
                .with_child(Element::new("summary").with_text("More info"))
                .with_text("loose")
                .with_child(Element::new("p").with_text("folded away"));
            if open { el.with_attr("open", "") } else { el }
        };

        let closed = Element::new("body").with_child(details(false));
        assert_eq!(rendered(&closed), "More info");

        let open = Element::new("body").with_child(details(true));
        assert_eq!(rendered(&open), "More info loose folded away");
    }

    #[test]
    fn test_remove_descendants_is_exhaustive() {
        let mut body = Element::new("body")
            .with_child(Element::new("nav").with_text("a"))
            .with_child(
                Element::new("div")
                    .with_child(Element::new("nav").with_text("b"))
                    .with_child(Element::new("p").with_text("keep")),
            )
            .with_child(Element::new("nav").with_text("c"));

        let removed = body.remove_descendants(|el| el.tag() == "nav");

        assert_eq!(removed, 3);
        assert_eq!(rendered(&body), "keep");
    }

    #[test]
    fn test_remove_descendants_never_removes_root() {
        let mut body = Element::new("nav").with_child(Element::new("p").with_text("x"));
        let removed = body.remove_descendants(|el| el.tag() == "nav");
        assert_eq!(removed, 0);
        assert_eq!(body.children().len(), 1);
    }

    #[test]
    fn test_class_tokens() {
        let el = Element::new("DIV").with_class("ad").with_class("wide");
        assert_eq!(el.tag(), "div");
        assert_eq!(el.attr("CLASS"), Some("ad wide"));
        assert!(el.has_class("ad"));
        assert!(!el.has_class("a"));
        assert_eq!(el.classes().count(), 2);
    }

    #[test]
    fn test_set_attr_replaces() {
        let el = Element::new("div").with_attr("role", "main").with_attr("ROLE", "banner");
        assert_eq!(el.attributes().count(), 1);
        assert_eq!(el.attr("role"), Some("banner"));
    }

    #[test]
    fn test_node_count() {
        let body = Element::new("body")
            .with_text("t")
            .with_child(Element::new("p").with_text("u"));
        assert_eq!(body.node_count(), 4);
    }

    #[test]
    fn test_deep_tree_renders_without_recursion() {
        let mut el = Element::new("span").with_text("leaf");
        for _ in 0..5_000 {
            el = Element::new("span").with_child(el);
        }
        assert_eq!(rendered(&el), "leaf");
        // Unwind iteratively so dropping the fixture does not recurse 5,000 levels.
        let mut current = el;
        while let Some(Node::Element(child)) = current.children.pop() {
            current = child;
        }
    }
}
