//! Recursive, renderer-driven tree serializer.

use std::borrow::Cow;
use std::fmt::Write;

use indexmap::IndexMap;

use crate::element::Element;

/// Already-formatted components of one element, handed to a [`NodeRenderer`].
///
/// `text`, `tail` and attribute values are escaped for markup. `children` is
/// the concatenated output of the renderer for every child, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeParts<'a> {
    /// Element tag name.
    pub tag: &'a str,
    /// Attribute string, e.g. `r#" a="1" b="2""#`, or empty.
    pub attributes: &'a str,
    /// Element text, or empty.
    pub text: &'a str,
    /// Rendered children.
    pub children: &'a str,
    /// Element tail, or empty.
    pub tail: &'a str,
    /// Indentation level of this element.
    pub indent: usize,
}

/// Per-node formatting hook.
///
/// Any `Fn(&NodeParts<'_>) -> String` is a renderer.
pub trait NodeRenderer {
    /// Render one element from its parts. The result is used verbatim.
    fn render_node(&self, parts: &NodeParts<'_>) -> String;
}

impl<F> NodeRenderer for F
where
    F: Fn(&NodeParts<'_>) -> String,
{
    fn render_node(&self, parts: &NodeParts<'_>) -> String {
        self(parts)
    }
}

/// Renders `<tag attrs>text children</tag>tail` with no added whitespace.
///
/// Output matches [`Element::to_xml`] byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl NodeRenderer for DefaultRenderer {
    fn render_node(&self, parts: &NodeParts<'_>) -> String {
        let NodeParts {
            tag,
            attributes,
            text,
            children,
            tail,
            indent: _,
        } = *parts;
        let mut out = String::with_capacity(
            2 * tag.len() + attributes.len() + text.len() + children.len() + tail.len() + 5,
        );
        write!(out, "<{tag}{attributes}>{text}{children}</{tag}>{tail}").unwrap();
        out
    }
}

/// Depth-first serializer that delegates per-node output to a [`NodeRenderer`].
pub struct TreeSerializer<'r> {
    renderer: &'r dyn NodeRenderer,
    indent: usize,
    indent_increment: usize,
}

impl TreeSerializer<'static> {
    /// Create a serializer using [`DefaultRenderer`], starting at level 0 with
    /// an increment of 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            renderer: &DefaultRenderer,
            indent: 0,
            indent_increment: 1,
        }
    }
}

impl Default for TreeSerializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> TreeSerializer<'r> {
    /// Use a custom renderer for every node.
    #[must_use]
    pub fn with_renderer<'n>(self, renderer: &'n dyn NodeRenderer) -> TreeSerializer<'n> {
        TreeSerializer {
            renderer,
            indent: self.indent,
            indent_increment: self.indent_increment,
        }
    }

    /// Set the indentation level of the root element.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set how much the level grows from parent to child.
    #[must_use]
    pub fn with_indent_increment(mut self, indent_increment: usize) -> Self {
        self.indent_increment = indent_increment;
        self
    }

    /// Serialize `element` and its whole subtree.
    pub fn serialize(&self, element: &Element) -> String {
        let out = self.serialize_at(element, self.indent);
        tracing::debug!(
            tag = %element.tag,
            bytes = out.len(),
            indent_increment = self.indent_increment,
            "Serialized element tree"
        );
        out
    }

    fn serialize_at(&self, element: &Element, indent: usize) -> String {
        let child_indent = indent + self.indent_increment;
        let children: String = element
            .children
            .iter()
            .map(|child| self.serialize_at(child, child_indent))
            .collect();
        let attributes = format_attributes(&element.attrs);
        let text = escape_text(&element.text);
        let tail = escape_text(&element.tail);

        self.renderer.render_node(&NodeParts {
            tag: &element.tag,
            attributes: &attributes,
            text: &text,
            children: &children,
            tail: &tail,
            indent,
        })
    }
}

/// Serialize with the default renderer.
pub fn serialize(element: &Element) -> String {
    TreeSerializer::new().serialize(element)
}

/// Format attributes as `key="value"` pairs in insertion order.
///
/// Pairs are separated by single spaces with one leading space, or the empty
/// string when there are no attributes.
pub fn format_attributes(attrs: &IndexMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in attrs {
        write!(out, r#" {key}="{}""#, escape_attr(value)).unwrap();
    }
    out
}

/// Escape text content (`&`, `<`, `>`).
pub fn escape_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::partial_escape(text)
}

/// Escape an attribute value (`&`, `<`, `>`, `"`, `'`).
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}
