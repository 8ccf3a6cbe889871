//! Rendering instance combining tree, highlighter and template.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::{self, Write};

use uuid::Uuid;
use xmlview_highlight::{DEFAULT_STYLE, Highlighter};
use xmlview_tree::{Element, TreeSerializer, XmlInput};

use crate::error::DisplayError;
use crate::foldable::{BlankText, FoldableRenderer};
use crate::gallery::StyleGallery;
use crate::template::{Template, TemplateContext};

/// Rules for the fold widgets, appended after the theme CSS.
const FOLD_CSS_RULES: &[&str] = &[
    "pre { margin: 0 0; font-family: inherit; }",
    ".highlight { display: inline; }",
    "summary::marker { font-size: 0.66em; margin-inline-end: 0.4em; }",
    "summary::-webkit-details-marker { width: 0.66em; margin-inline-end: 0.4em; }",
    ".indented-xml-content { padding-left: 1.06em; }",
];

/// Options for an [`XmlDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Highlighting style name.
    pub style: String,
    /// Wrapper template.
    pub template: Template,
    /// Named values for `{extras.NAME}` slots.
    pub extras: BTreeMap<String, String>,
    /// Open every fold by default.
    pub expand: bool,
    /// Indentation increase from parent to child, in `em`.
    pub indent_increment: usize,
    /// Whitespace-only text handling.
    pub blank_text: BlankText,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_owned(),
            template: Template::bare(),
            extras: BTreeMap::new(),
            expand: false,
            indent_increment: 1,
            blank_text: BlankText::default(),
        }
    }
}

impl DisplayOptions {
    /// Set the highlighting style.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the wrapper template.
    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    /// Add a named extra value.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Set whether folds start open.
    #[must_use]
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Set the indentation increment.
    #[must_use]
    pub fn with_indent_increment(mut self, indent_increment: usize) -> Self {
        self.indent_increment = indent_increment;
        self
    }

    /// Set whitespace-only text handling.
    #[must_use]
    pub fn with_blank_text(mut self, blank_text: BlankText) -> Self {
        self.blank_text = blank_text;
        self
    }
}

/// One XML document prepared for HTML display.
///
/// Every instance has its own CSS class, so several displays with different
/// styles can coexist on one page.
#[derive(Debug, Clone)]
pub struct XmlDisplay {
    root: Element,
    highlighter: Highlighter,
    unique_class: String,
    options: DisplayOptions,
}

impl XmlDisplay {
    /// Create a display from any accepted input.
    ///
    /// Text and bytes are parsed here; parse errors and unknown styles are
    /// returned immediately.
    pub fn new(input: impl Into<XmlInput>, options: DisplayOptions) -> Result<Self, DisplayError> {
        let input = input.into();
        tracing::debug!(kind = input.kind(), style = %options.style, "Creating XML display");
        let root = input.into_root()?;
        let highlighter = Highlighter::new(&options.style)?;
        Ok(Self::from_parts(root, highlighter, options))
    }

    /// Create a display from a type-erased value.
    ///
    /// Fails with [`DisplayError::Input`] when the value is not text, bytes,
    /// an element or a document.
    pub fn from_any<T: Any>(value: T, options: DisplayOptions) -> Result<Self, DisplayError> {
        Self::new(XmlInput::from_any(value)?, options)
    }

    /// Iterate over one titled display per available style.
    ///
    /// The input is parsed once. Each call returns a fresh iterator.
    pub fn gallery(
        input: impl Into<XmlInput>,
        options: DisplayOptions,
    ) -> Result<StyleGallery, DisplayError> {
        let root = input.into().into_root()?;
        Ok(StyleGallery::new(root, options))
    }

    pub(crate) fn from_parts(
        root: Element,
        highlighter: Highlighter,
        options: DisplayOptions,
    ) -> Self {
        Self {
            root,
            highlighter,
            unique_class: format!("a{}", Uuid::new_v4().simple()),
            options,
        }
    }

    /// Root element being displayed.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Highlighting style name.
    #[must_use]
    pub fn style(&self) -> &str {
        self.highlighter.style()
    }

    /// Per-instance CSS class.
    #[must_use]
    pub fn unique_class(&self) -> &str {
        &self.unique_class
    }

    /// Options this display was created with.
    #[must_use]
    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Theme and fold-widget CSS, scoped to [`Self::unique_class`].
    pub fn style_css(&self) -> Result<String, DisplayError> {
        let scope = format!("div.{}", self.unique_class);
        let mut css = self.highlighter.style_css(&scope)?;
        for rule in FOLD_CSS_RULES {
            writeln!(css, "{scope} {rule}").unwrap();
        }
        Ok(css)
    }

    /// Foldable HTML for the element tree, without the template wrapper.
    pub fn body_content(&self) -> String {
        let renderer = FoldableRenderer::new(&self.highlighter)
            .with_expand(self.options.expand)
            .with_blank_text(self.options.blank_text);
        TreeSerializer::new()
            .with_renderer(&renderer)
            .with_indent_increment(self.options.indent_increment)
            .serialize(&self.root)
    }

    /// Complete HTML fragment: template filled with CSS and body.
    pub fn to_html(&self) -> Result<String, DisplayError> {
        let css_rules = self.style_css()?;
        let body_content = self.body_content();
        let html = self.options.template.render(&TemplateContext {
            unique_class: &self.unique_class,
            css_rules: &css_rules,
            body_content: &body_content,
            extras: &self.options.extras,
        })?;
        tracing::debug!(
            style = self.style(),
            class = %self.unique_class,
            bytes = html.len(),
            "Rendered XML display"
        );
        Ok(html)
    }
}

impl fmt::Display for XmlDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let html = self.to_html().map_err(|_| fmt::Error)?;
        f.write_str(&html)
    }
}
