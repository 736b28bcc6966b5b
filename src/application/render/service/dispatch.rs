//! Node dispatcher: maps each document node to markup by kind.
//!
//! Every node renders independently from its own data and its position key.
//! Sibling output is concatenated in document order, and a node that cannot
//! be rendered contributes nothing instead of failing the document.

use std::fmt;

use tracing::debug;

use crate::domain::document::{Document, DocumentNode, Link, ListKind, TextRun};
use crate::domain::slug::anchor_candidate;

use super::blocks::{BlockDefaults, render_block};
use super::highlight::Highlighter;
use super::html::{escape_attribute, escape_text, wrap};

/// Position of a node inside the rendered tree, e.g. `0-3-1`. Stable for a
/// given document, so it doubles as an element id suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct RenderKey(String);

impl RenderKey {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    pub(crate) fn child(&self, index: usize) -> Self {
        if self.0.is_empty() {
            Self(index.to_string())
        } else {
            Self(format!("{}-{index}", self.0))
        }
    }

    /// Key for a named region inside a block, such as a column.
    pub(crate) fn scope(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}-{name}", self.0))
        }
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable rendering context shared by every node of one render.
pub(crate) struct Dispatcher<'a> {
    pub(crate) highlighter: Highlighter<'a>,
    pub(crate) blocks: BlockDefaults,
    pub(crate) slug: &'a str,
}

impl Dispatcher<'_> {
    /// Render the top-level children of a document.
    pub(crate) fn render_document(&self, document: &Document) -> String {
        self.render_nested(document, &RenderKey::root())
    }

    /// Render a document embedded in a block, keyed under `parent`.
    pub(crate) fn render_nested(&self, document: &Document, parent: &RenderKey) -> String {
        self.render_children(document.children(), parent)
    }

    pub(crate) fn render_children(&self, children: &[DocumentNode], parent: &RenderKey) -> String {
        children
            .iter()
            .enumerate()
            .map(|(index, child)| self.render_node(child, &parent.child(index)))
            .collect()
    }

    pub(crate) fn render_node(&self, node: &DocumentNode, key: &RenderKey) -> String {
        match node {
            DocumentNode::Root { children } => self.render_children(children, key),
            DocumentNode::Paragraph { children } => wrap("p", &self.render_children(children, key)),
            DocumentNode::Heading { level, children } => {
                let tag = level.tag_name();
                let anchor = anchor_candidate(&node.plain_text());
                format!(
                    "<{tag} data-anchor=\"{}\">{}</{tag}>",
                    escape_attribute(&anchor),
                    self.render_children(children, key)
                )
            }
            DocumentNode::Quote { children } => {
                wrap("blockquote", &self.render_children(children, key))
            }
            DocumentNode::List { kind, children } => {
                render_list(*kind, &self.render_children(children, key))
            }
            DocumentNode::ListItem { children } => wrap("li", &self.render_children(children, key)),
            DocumentNode::Link { link, children } => {
                render_link(link, &self.render_children(children, key))
            }
            DocumentNode::Text(run) => render_text(run),
            DocumentNode::LineBreak => "<br>".to_string(),
            DocumentNode::HorizontalRule => "<hr>".to_string(),
            DocumentNode::Block(block) => render_block(self, block, key),
            DocumentNode::Unknown { kind, children } => {
                debug!(
                    target = "application::render::dispatch",
                    slug = self.slug,
                    key = %key,
                    kind = kind.as_deref().unwrap_or("<missing>"),
                    "rendering unknown node as plain container"
                );
                self.render_children(children, key)
            }
        }
    }
}

fn render_list(kind: ListKind, items: &str) -> String {
    match kind {
        ListKind::Numbered { start: Some(start) } => format!("<ol start=\"{start}\">{items}</ol>"),
        other => wrap(other.tag_name(), items),
    }
}

fn render_link(link: &Link, inner: &str) -> String {
    let Some(url) = link.url.as_deref() else {
        return inner.to_string();
    };

    let href = escape_attribute(url);
    if link.new_tab {
        format!("<a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">{inner}</a>")
    } else {
        format!("<a href=\"{href}\">{inner}</a>")
    }
}

/// Escaped text wrapped in one element per set format flag, outermost first.
pub(crate) fn render_text(run: &TextRun) -> String {
    let tags: Vec<&str> = run.format.wrapping_tags().collect();
    let mut html = String::new();
    for tag in &tags {
        html.push('<');
        html.push_str(tag);
        html.push('>');
    }
    html.push_str(&escape_text(&run.text));
    for tag in tags.iter().rev() {
        html.push_str("</");
        html.push_str(tag);
        html.push('>');
    }
    html
}
