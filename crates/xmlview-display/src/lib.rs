//! Foldable, syntax-highlighted HTML display of XML documents.
//!
//! [`XmlDisplay`] takes XML text, bytes or a parsed tree, and renders it as
//! nested `<details>` blocks with highlighted tags. The output is an HTML
//! fragment for notebook-style surfaces. Its CSS is scoped to a class that
//! is unique to each instance.
//!
//! # Example
//!
//! ```
//! use xmlview_display::{DisplayOptions, XmlDisplay};
//!
//! let display = XmlDisplay::new("<a><b>x</b></a>", DisplayOptions::default().with_expand(true))
//!     .unwrap();
//! let html = display.to_html().unwrap();
//! assert!(html.contains("<details open>"));
//! ```
//!
//! [`XmlDisplay::gallery`] previews the same document in every style.

mod display;
mod error;
mod foldable;
mod gallery;
mod template;

pub use display::{DisplayOptions, XmlDisplay};
pub use error::DisplayError;
pub use foldable::{BlankText, FoldableRenderer};
pub use gallery::{STYLE_NAME_EXTRA, StyleGallery, render_gallery};
pub use template::{Template, TemplateContext, TemplateError};
