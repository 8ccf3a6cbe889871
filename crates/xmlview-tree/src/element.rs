//! Element tree representation.

use std::borrow::Cow;

use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::error::SerializeError;
use crate::serializer::{escape_attr, escape_text};

/// Node in a parsed XML tree.
///
/// Text and attribute values are stored decoded. An absent text or tail is
/// the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Element tag name, including any namespace prefix.
    pub tag: String,
    /// Attributes in document order.
    pub attrs: IndexMap<String, String>,
    /// Text between the opening tag and the first child.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<Element>,
    /// Text after the closing tag (XML tail).
    pub tail: String,
}

impl Element {
    /// Create a new element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Append an attribute, replacing the value if the key already exists.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    /// Number of elements in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Element::node_count).sum::<usize>()
    }

    /// Canonical non-pretty serialization written through `quick-xml`.
    ///
    /// Elements are always written as start/end pairs, text is partially
    /// escaped and attribute values fully escaped. No whitespace is added.
    pub fn to_xml(&self) -> Result<String, SerializeError> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), SerializeError> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attr(value).into_owned().into_bytes()),
        });
    }
    writer.write_event(Event::Start(start))?;

    if !element.text.is_empty() {
        writer.write_event(Event::Text(BytesText::from_escaped(escape_text(&element.text))))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }

    writer.write_event(Event::End(BytesEnd::new(element.tag.as_str())))?;

    if !element.tail.is_empty() {
        writer.write_event(Event::Text(BytesText::from_escaped(escape_text(&element.tail))))?;
    }
    Ok(())
}

/// Parsed document wrapping its root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Wrap an existing root element.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Root element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Consume the document, returning the root element.
    #[must_use]
    pub fn into_root(self) -> Element {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_sets_parts() {
        let el = Element::new("p")
            .with_text("Hello")
            .with_tail(" after")
            .with_attr("class", "x")
            .with_children(vec![Element::new("b")]);

        assert_eq!(el.tag, "p");
        assert_eq!(el.text, "Hello");
        assert_eq!(el.tail, " after");
        assert_eq!(el.attrs.get("class").map(String::as_str), Some("x"));
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_attrs_keep_insertion_order() {
        let el = Element::new("a")
            .with_attr("z", "1")
            .with_attr("a", "2")
            .with_attr("m", "3");
        let keys: Vec<&str> = el.attrs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_node_count() {
        let el = Element::new("r").with_children(vec![
            Element::new("a").with_children(vec![Element::new("b")]),
            Element::new("c"),
        ]);
        assert_eq!(el.node_count(), 4);
    }

    #[test]
    fn test_to_xml_simple() {
        let el = Element::new("p")
            .with_attr("class", "royals")
            .with_text("Hi")
            .with_children(vec![Element::new("br").with_tail("there")]);
        assert_eq!(
            el.to_xml().unwrap(),
            r#"<p class="royals">Hi<br></br>there</p>"#
        );
    }

    #[test]
    fn test_to_xml_escapes_once() {
        let el = Element::new("p")
            .with_attr("title", r#"say "hi" & <bye>"#)
            .with_text("a < b & c");
        assert_eq!(
            el.to_xml().unwrap(),
            r#"<p title="say &quot;hi&quot; &amp; &lt;bye&gt;">a &lt; b &amp; c</p>"#
        );
    }

    #[test]
    fn test_document_into_root() {
        let doc = Document::new(Element::new("root"));
        assert_eq!(doc.root().tag, "root");
        assert_eq!(doc.into_root(), Element::new("root"));
    }
}
