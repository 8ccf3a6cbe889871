//! XML syntax highlighting backed by `syntect`.
//!
//! Styles are the `syntect` default themes. HTML output uses CSS classes
//! rather than inline colors, so the theme rules from
//! [`Highlighter::style_css`] must be included on the page. The rules are
//! prefixed with a caller-chosen scope selector so that several renderings
//! with different styles can share one page.

mod css;

use std::collections::btree_map;
use std::sync::LazyLock;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

pub use css::scope_css;

/// Style name that selects [`DEFAULT_THEME`].
pub const DEFAULT_STYLE: &str = "default";

/// Theme used for [`DEFAULT_STYLE`].
pub const DEFAULT_THEME: &str = "InspiredGitHub";

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Class style shared by generated spans and theme CSS.
const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Error during highlighting.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HighlightError {
    /// Requested style is not available.
    #[error("unknown style {name:?}; available styles: {available}")]
    UnknownStyle {
        /// Requested style name.
        name: String,
        /// Comma-separated available style names.
        available: String,
    },

    /// The syntax set has no XML grammar.
    #[error("no syntax definition for {0}")]
    MissingSyntax(&'static str),

    /// Error reported by `syntect`.
    #[error("highlighting failed: {0}")]
    Syntect(#[from] syntect::Error),
}

/// Names of every available style, in sorted order.
///
/// The [`DEFAULT_STYLE`] alias is not included.
pub fn available_styles() -> Vec<String> {
    THEME_SET.themes.keys().cloned().collect()
}

/// Highlighter for every available style, in sorted order.
pub fn all_styles() -> StyleIter {
    StyleIter {
        themes: THEME_SET.themes.iter(),
    }
}

/// Iterator over one [`Highlighter`] per available style.
#[derive(Debug, Clone)]
pub struct StyleIter {
    themes: btree_map::Iter<'static, String, Theme>,
}

impl Iterator for StyleIter {
    type Item = Highlighter;

    fn next(&mut self) -> Option<Highlighter> {
        self.themes.next().map(|(name, theme)| Highlighter {
            style: name.clone(),
            theme,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.themes.size_hint()
    }
}

impl ExactSizeIterator for StyleIter {}

/// XML highlighter configured with one style.
#[derive(Debug, Clone)]
pub struct Highlighter {
    style: String,
    theme: &'static Theme,
}

impl Highlighter {
    /// Create a highlighter for `style`.
    ///
    /// `"default"` selects [`DEFAULT_THEME`].
    pub fn new(style: &str) -> Result<Self, HighlightError> {
        let theme_name = if style == DEFAULT_STYLE {
            DEFAULT_THEME
        } else {
            style
        };
        let theme = THEME_SET
            .themes
            .get(theme_name)
            .ok_or_else(|| HighlightError::UnknownStyle {
                name: style.to_owned(),
                available: available_styles().join(", "),
            })?;
        tracing::debug!(style, theme = theme_name, "Created highlighter");
        Ok(Self {
            style: style.to_owned(),
            theme,
        })
    }

    /// Style name as requested.
    #[must_use]
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Highlight `source` as a block: `<div class="highlight code"><pre>…</pre></div>`.
    pub fn highlight(&self, source: &str) -> Result<String, HighlightError> {
        let spans = highlight_spans(source)?;
        Ok(format!(
            "<div class=\"highlight code\"><pre>{spans}</pre></div>\n"
        ))
    }

    /// Highlight `source` without the `<pre>` wrapper, for inline use.
    pub fn highlight_inline(&self, source: &str) -> Result<String, HighlightError> {
        let spans = highlight_spans(source)?;
        Ok(format!("<div class=\"highlight code\">{spans}</div>\n"))
    }

    /// Theme CSS with every selector prefixed by `scope`.
    pub fn style_css(&self, scope: &str) -> Result<String, HighlightError> {
        let css = css_for_theme_with_class_style(self.theme, CLASS_STYLE)?;
        Ok(scope_css(&css, scope))
    }
}

fn xml_syntax() -> Result<&'static SyntaxReference, HighlightError> {
    SYNTAX_SET
        .find_syntax_by_extension("xml")
        .ok_or(HighlightError::MissingSyntax("XML"))
}

/// Class-annotated spans for `source`, which always ends with a newline.
fn highlight_spans(source: &str) -> Result<String, HighlightError> {
    let syntax = xml_syntax()?;
    let mut html_gen = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);
    for line in LinesWithEndings::from(source) {
        html_gen.parse_html_for_line_which_includes_newline(line)?;
    }
    if !source.ends_with('\n') {
        html_gen.parse_html_for_line_which_includes_newline("\n")?;
    }
    Ok(html_gen.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_available_styles_sorted_and_non_empty() {
        let styles = available_styles();
        assert!(!styles.is_empty());
        let mut sorted = styles.clone();
        sorted.sort();
        assert_eq!(styles, sorted);
        assert!(styles.iter().any(|s| s == DEFAULT_THEME));
    }

    #[test]
    fn test_all_styles_matches_names() {
        let names: Vec<String> = all_styles().map(|hl| hl.style().to_owned()).collect();
        assert_eq!(names, available_styles());
        assert_eq!(all_styles().len(), names.len());
    }

    #[test]
    fn test_default_alias() {
        let hl = Highlighter::new(DEFAULT_STYLE).unwrap();
        assert_eq!(hl.style(), "default");
    }

    #[test]
    fn test_unknown_style() {
        let err = Highlighter::new("no-such-style").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no-such-style"), "{message}");
        assert!(message.contains(DEFAULT_THEME), "{message}");
    }

    #[test]
    fn test_highlight_block_wraps_pre() {
        let hl = Highlighter::new(DEFAULT_STYLE).unwrap();
        let html = hl.highlight("</child>").unwrap();
        assert!(html.starts_with("<div class=\"highlight code\"><pre>"), "{html}");
        assert!(html.contains("</pre></div>"), "{html}");
        assert!(html.contains("<span"), "{html}");
        assert!(html.contains("child"), "{html}");
        assert!(!html.contains("</child>"), "markup must be escaped: {html}");
    }

    #[test]
    fn test_highlight_inline_has_no_pre() {
        let hl = Highlighter::new(DEFAULT_STYLE).unwrap();
        let html = hl.highlight_inline(r#"<parent class="royals">"#).unwrap();
        assert!(!html.contains("<pre>"), "{html}");
        assert!(html.contains("royals"), "{html}");
    }

    #[test]
    fn test_style_css_is_scoped() {
        let hl = Highlighter::new(DEFAULT_STYLE).unwrap();
        let css = hl.style_css("div.abc").unwrap();
        assert!(css.contains('{'));
        for line in css.lines() {
            if let Some((selectors, _)) = line.split_once('{') {
                for selector in selectors.split(',') {
                    assert!(
                        selector.trim().starts_with("div.abc "),
                        "unscoped selector in {line:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_style_produces_css() {
        for style in available_styles() {
            let hl = Highlighter::new(&style).unwrap();
            assert!(!hl.style_css("div.x").unwrap().is_empty(), "{style}");
        }
    }
}
