//! XML element tree with a hook-driven markup serializer.
//!
//! The crate has three layers:
//! - [`Element`] / [`Document`]: an owned, read-only view of a parsed XML tree
//!   with lxml-style `text` and `tail` strings.
//! - [`parse_str`] / [`parse_bytes`]: build a [`Document`] with `quick-xml`,
//!   keeping source whitespace.
//! - [`TreeSerializer`]: depth-first serialization where each node is handed to
//!   a [`NodeRenderer`] together with its already-rendered children.
//!
//! # Example
//!
//! ```
//! use xmlview_tree::{NodeParts, TreeSerializer, parse_str};
//!
//! let doc = parse_str("<a x=\"1\">hi<b/>there</a>").unwrap();
//! assert_eq!(xmlview_tree::serialize(doc.root()), "<a x=\"1\">hi<b></b>there</a>");
//!
//! fn shout(parts: &NodeParts<'_>) -> String {
//!     let tag = parts.tag.to_uppercase();
//!     format!("<{tag}{}>{}{}</{tag}>{}", parts.attributes, parts.text, parts.children, parts.tail)
//! }
//! let out = TreeSerializer::new().with_renderer(&shout).serialize(doc.root());
//! assert_eq!(out, "<A x=\"1\">hi<B></B>there</A>");
//! ```

mod element;
mod error;
mod input;
mod parser;
mod serializer;

pub use element::{Document, Element};
pub use error::{InputError, ParseError, SerializeError};
pub use input::{ACCEPTED_INPUT_TYPES, XmlInput};
pub use parser::{parse_bytes, parse_str};
pub use serializer::{
    DefaultRenderer, NodeParts, NodeRenderer, TreeSerializer, escape_attr, escape_text,
    format_attributes, serialize,
};
