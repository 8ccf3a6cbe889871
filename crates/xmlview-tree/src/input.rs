//! Accepted XML input representations.

use std::any::{Any, type_name};

use crate::element::{Document, Element};
use crate::error::{InputError, ParseError};
use crate::parser::{parse_bytes, parse_str};

/// Type names accepted by [`XmlInput::from_any`].
pub const ACCEPTED_INPUT_TYPES: &[&str] = &[
    "String",
    "&str",
    "Vec<u8>",
    "&[u8]",
    "xmlview_tree::Element",
    "xmlview_tree::Document",
];

/// XML given as text, bytes or an already-parsed tree.
#[derive(Debug, Clone)]
pub enum XmlInput {
    /// Well-formed XML text.
    Text(String),
    /// Well-formed XML bytes (UTF-8).
    Bytes(Vec<u8>),
    /// Parsed element, used as the root.
    Element(Element),
    /// Parsed document, its root is extracted.
    Document(Document),
}

impl XmlInput {
    /// Resolve a type-erased value into an input.
    ///
    /// Accepts the types listed in [`ACCEPTED_INPUT_TYPES`]. Anything else
    /// is rejected with [`InputError::UnsupportedType`].
    pub fn from_any<T: Any>(value: T) -> Result<Self, InputError> {
        let value: Box<dyn Any> = Box::new(value);
        let value = match value.downcast::<String>() {
            Ok(text) => return Ok(Self::Text(*text)),
            Err(other) => other,
        };
        let value = match value.downcast::<&'static str>() {
            Ok(text) => return Ok(Self::Text((*text).to_owned())),
            Err(other) => other,
        };
        let value = match value.downcast::<Vec<u8>>() {
            Ok(bytes) => return Ok(Self::Bytes(*bytes)),
            Err(other) => other,
        };
        let value = match value.downcast::<&'static [u8]>() {
            Ok(bytes) => return Ok(Self::Bytes(bytes.to_vec())),
            Err(other) => other,
        };
        let value = match value.downcast::<Element>() {
            Ok(element) => return Ok(Self::Element(*element)),
            Err(other) => other,
        };
        if let Ok(document) = value.downcast::<Document>() {
            return Ok(Self::Document(*document));
        }

        Err(InputError::UnsupportedType {
            received: type_name::<T>(),
            accepted: ACCEPTED_INPUT_TYPES.join(", "),
        })
    }

    /// Short name of the representation, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Element(_) => "element",
            Self::Document(_) => "document",
        }
    }

    /// Resolve to the root element, parsing text and bytes.
    ///
    /// Parse errors are returned unchanged.
    pub fn into_root(self) -> Result<Element, ParseError> {
        match self {
            Self::Text(text) => Ok(parse_str(&text)?.into_root()),
            Self::Bytes(bytes) => Ok(parse_bytes(&bytes)?.into_root()),
            Self::Element(element) => Ok(element),
            Self::Document(document) => Ok(document.into_root()),
        }
    }
}

impl From<String> for XmlInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for XmlInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for XmlInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for XmlInput {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<Element> for XmlInput {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<Document> for XmlInput {
    fn from(document: Document) -> Self {
        Self::Document(document)
    }
}
