//! Foldable HTML node renderer.
//!
//! Each element becomes a `<details>` block whose `<summary>` is the
//! highlighted opening tag. Depth is shown with a `margin-left` in `em`.

use std::fmt::Write;

use xmlview_highlight::Highlighter;
use xmlview_tree::{NodeParts, NodeRenderer};

/// Handling of text and tail that contain only whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlankText {
    /// Keep text exactly as in the source.
    Preserve,
    /// Render whitespace-only text and tail as empty.
    #[default]
    Drop,
}

impl BlankText {
    fn apply(self, text: &str) -> &str {
        match self {
            Self::Drop if text.trim().is_empty() => "",
            _ => text,
        }
    }
}

/// [`NodeRenderer`] producing nested `<details>` blocks.
#[derive(Debug, Clone, Copy)]
pub struct FoldableRenderer<'h> {
    highlighter: &'h Highlighter,
    expand: bool,
    blank_text: BlankText,
}

impl<'h> FoldableRenderer<'h> {
    /// Create a renderer using `highlighter` for tags.
    #[must_use]
    pub fn new(highlighter: &'h Highlighter) -> Self {
        Self {
            highlighter,
            expand: false,
            blank_text: BlankText::default(),
        }
    }

    /// Open every `<details>` block by default.
    #[must_use]
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Set whitespace-only text handling.
    #[must_use]
    pub fn with_blank_text(mut self, blank_text: BlankText) -> Self {
        self.blank_text = blank_text;
        self
    }

    fn highlight_tag(&self, tag: &str, inline: bool) -> String {
        let result = if inline {
            self.highlighter.highlight_inline(tag)
        } else {
            self.highlighter.highlight(tag)
        };
        result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, tag, "Highlighting failed, using plain tag");
            xmlview_tree::escape_text(tag).into_owned()
        })
    }
}

impl NodeRenderer for FoldableRenderer<'_> {
    fn render_node(&self, parts: &NodeParts<'_>) -> String {
        let opening_tag = self.highlight_tag(&format!("<{}{}>", parts.tag, parts.attributes), true);
        let closing_tag = self.highlight_tag(&format!("</{}>", parts.tag), false);
        let text = self.blank_text.apply(parts.text);
        let tail = self.blank_text.apply(parts.tail);
        let open = if self.expand { " open" } else { "" };

        let mut out = String::with_capacity(
            opening_tag.len() + closing_tag.len() + parts.children.len() + 256,
        );
        write!(
            out,
            r#"
    <div class="indented-xml" style="margin-left:{indent}em;">
        <details{open}>
            <summary>{opening_tag}</summary>
            <div class="indented-xml-content">
                {text}{children}
                {closing_tag}{tail}
            </div>
        </details>
    </div>
"#,
            indent = parts.indent,
            children = parts.children,
        )
        .unwrap();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xmlview_tree::{TreeSerializer, parse_str};

    fn highlighter() -> Highlighter {
        Highlighter::new("default").unwrap()
    }

    #[test]
    fn test_blank_text_modes() {
        assert_eq!(BlankText::Drop.apply("\n   "), "");
        assert_eq!(BlankText::Drop.apply(" x "), " x ");
        assert_eq!(BlankText::Preserve.apply("\n   "), "\n   ");
    }

    #[test]
    fn test_one_details_per_element() {
        let hl = highlighter();
        let renderer = FoldableRenderer::new(&hl);
        let doc = parse_str("<a><b/><c><d/></c></a>").unwrap();
        let html = TreeSerializer::new()
            .with_renderer(&renderer)
            .serialize(doc.root());
        assert_eq!(html.matches("<details>").count(), 4);
        assert_eq!(html.matches("</details>").count(), 4);
        assert!(!html.contains("<details open>"));
    }

    #[test]
    fn test_expand_opens_every_block() {
        let hl = highlighter();
        let renderer = FoldableRenderer::new(&hl).with_expand(true);
        let doc = parse_str("<a><b/><c/></a>").unwrap();
        let html = TreeSerializer::new()
            .with_renderer(&renderer)
            .serialize(doc.root());
        assert_eq!(html.matches("<details open>").count(), 3);
        assert_eq!(html.matches("<details>").count(), 0);
    }

    #[test]
    fn test_margin_follows_depth() {
        let hl = highlighter();
        let renderer = FoldableRenderer::new(&hl);
        let doc = parse_str("<a><b><c/></b></a>").unwrap();
        let html = TreeSerializer::new()
            .with_renderer(&renderer)
            .with_indent_increment(2)
            .serialize(doc.root());
        let margins: Vec<&str> = html
            .match_indices("margin-left:")
            .map(|(i, _)| &html[i..i + "margin-left:0em".len() + 1])
            .collect();
        assert_eq!(margins.len(), 3);
        assert!(margins[0].starts_with("margin-left:0em"));
        assert!(margins[1].starts_with("margin-left:2em"));
        assert!(margins[2].starts_with("margin-left:4em"));
    }

    #[test]
    fn test_summary_has_no_pre_but_closing_tag_does() {
        let hl = highlighter();
        let renderer = FoldableRenderer::new(&hl);
        let html = renderer.render_node(&NodeParts {
            tag: "child",
            attributes: r#" class="royals""#,
            text: "Prince William",
            children: "",
            tail: "",
            indent: 0,
        });
        let summary_start = html.find("<summary>").unwrap();
        let summary_end = html.find("</summary>").unwrap();
        let summary = &html[summary_start..summary_end];
        assert!(!summary.contains("<pre>"), "{summary}");
        assert!(summary.contains("royals"), "{summary}");
        assert!(html[summary_end..].contains("<pre>"));
        assert!(html.contains("Prince William"));
    }

    #[test]
    fn test_blank_text_dropped_by_default() {
        let hl = highlighter();
        let parts = NodeParts {
            tag: "a",
            attributes: "",
            text: "\n    ",
            children: "",
            tail: "\n",
            indent: 0,
        };
        let dropped = FoldableRenderer::new(&hl).render_node(&parts);
        let kept = FoldableRenderer::new(&hl)
            .with_blank_text(BlankText::Preserve)
            .render_node(&parts);
        assert!(kept.len() > dropped.len());
        assert!(dropped.contains("<div class=\"indented-xml-content\">\n                \n"));
    }
}
