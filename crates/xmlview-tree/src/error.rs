//! Error types for tree parsing, input resolution and canonical serialization.

use std::string::FromUtf8Error;

/// Error while parsing XML text or bytes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Error reported by the XML reader (syntax, mismatched end tag, ...).
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute.
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Input is not valid in its declared or detected encoding.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Input contained no root element.
    #[error("document has no root element")]
    NoRootElement,

    /// Input ended while elements were still open.
    #[error("unclosed element <{0}> at end of input")]
    UnclosedElement(String),

    /// Markup or text found after the root element was closed.
    #[error("content after the root element")]
    ContentAfterRoot,

    /// Non-whitespace text outside the root element.
    #[error("text outside the root element: {0:?}")]
    TextOutsideRoot(String),

    /// Entity reference that is neither predefined nor a character reference.
    #[error("undefined entity reference &{0};")]
    UnknownEntity(String),
}

/// Error when a value cannot be used as XML input.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InputError {
    /// The value is not one of the accepted input representations.
    #[error("unsupported input of type `{received}`; accepted types are: {accepted}")]
    UnsupportedType {
        /// Type name of the rejected value.
        received: &'static str,
        /// Comma-separated list of accepted type names.
        accepted: String,
    },
}

/// Error while writing the canonical serialization.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// Writer I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writer error reported by `quick-xml`.
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writer produced invalid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),
}
