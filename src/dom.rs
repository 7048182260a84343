//! DOM adapter.
//!
//! Parses HTML with `dom_query` and copies the page body into a detached
//! [`tree::Element`](crate::tree::Element). The copy is bounded by
//! [`Options::max_depth`] and [`Options::max_nodes`] so that pathological
//! markup fails cleanly instead of exhausting the stack or memory.

pub use dom_query::{Document, NodeRef, Selection};

use crate::error::{Error, Result};
use crate::options::Options;
use crate::tree::{Element, Node};

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// The document's `<body>` element, if the parser produced one.
///
/// Frameset documents and non-HTML roots have none.
#[must_use]
pub fn body(doc: &Document) -> Option<NodeRef<'_>> {
    doc.select("html > body").nodes().first().copied()
}

/// Lowercase tag name of an element node.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Deep copy of an element into a detached tree.
///
/// Comments, processing instructions and doctype nodes are dropped; only
/// elements and text survive.
///
/// # Errors
///
/// [`Error::DepthLimit`] when nesting exceeds `options.max_depth`,
/// [`Error::NodeLimit`] when the copy would exceed `options.max_nodes`.
pub fn detach(node: &NodeRef, options: &Options) -> Result<Element> {
    let mut copier = Copier {
        max_depth: options.max_depth,
        max_nodes: options.max_nodes,
        copied: 0,
    };
    copier.element(node, 0)
}

struct Copier {
    max_depth: usize,
    max_nodes: usize,
    copied: usize,
}

impl Copier {
    fn charge(&mut self) -> Result<()> {
        self.copied += 1;
        if self.copied > self.max_nodes {
            return Err(Error::NodeLimit {
                limit: self.max_nodes,
            });
        }
        Ok(())
    }

    fn element(&mut self, node: &NodeRef, depth: usize) -> Result<Element> {
        if depth > self.max_depth {
            return Err(Error::DepthLimit {
                limit: self.max_depth,
            });
        }
        self.charge()?;

        let mut el = Element::new(tag_name(node).unwrap_or_default());
        for attr in node.attrs() {
            el.set_attr(&*attr.name.local, attr.value.to_string());
        }

        for child in node.children() {
            if child.is_element() {
                let copy = self.element(&child, depth + 1)?;
                el.push(copy);
            } else if child.is_text() {
                self.charge()?;
                el.push(Node::Text(child.text().to_string()));
            }
        }

        Ok(el)
    }
}
