//! Lazy iteration over every highlighting style.

use std::iter::FusedIterator;

use xmlview_highlight::{StyleIter, all_styles};
use xmlview_tree::{Element, XmlInput};

use crate::display::{DisplayOptions, XmlDisplay};
use crate::error::DisplayError;
use crate::template::Template;

/// Extra value holding the style name in titled templates.
pub const STYLE_NAME_EXTRA: &str = "style_name";

/// Iterator yielding one titled [`XmlDisplay`] per available style.
#[derive(Debug, Clone)]
pub struct StyleGallery {
    root: Element,
    options: DisplayOptions,
    styles: StyleIter,
}

impl StyleGallery {
    pub(crate) fn new(root: Element, options: DisplayOptions) -> Self {
        Self {
            root,
            options,
            styles: all_styles(),
        }
    }
}

impl Iterator for StyleGallery {
    type Item = XmlDisplay;

    fn next(&mut self) -> Option<XmlDisplay> {
        let highlighter = self.styles.next()?;
        let style = highlighter.style().to_owned();
        let options = self
            .options
            .clone()
            .with_style(style.clone())
            .with_template(Template::titled())
            .with_extra(STYLE_NAME_EXTRA, style);
        Some(XmlDisplay::from_parts(
            self.root.clone(),
            highlighter,
            options,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.styles.size_hint()
    }
}

impl ExactSizeIterator for StyleGallery {}

impl FusedIterator for StyleGallery {}

/// Render every style preview of `input` into one HTML string.
pub fn render_gallery(
    input: impl Into<XmlInput>,
    options: DisplayOptions,
) -> Result<String, DisplayError> {
    let gallery = XmlDisplay::gallery(input, options)?;
    let count = gallery.len();
    let mut out = String::new();
    for display in gallery {
        out.push_str(&display.to_html()?);
    }
    tracing::info!(styles = count, bytes = out.len(), "Rendered style gallery");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use pretty_assertions::assert_eq;
    use xmlview_highlight::available_styles;

    const XML: &str = "<root><a x=\"1\">text</a><b/></root>";

    #[test]
    fn test_gallery_yields_one_display_per_style() {
        let styles = available_styles();
        let gallery = XmlDisplay::gallery(XML, DisplayOptions::default()).unwrap();
        assert_eq!(gallery.len(), styles.len());

        let names: Vec<String> = gallery.map(|d| d.style().to_owned()).collect();
        assert_eq!(names, styles);
        let distinct: HashSet<&String> = names.iter().collect();
        assert_eq!(distinct.len(), names.len());
    }

    #[test]
    fn test_gallery_entries_are_titled() {
        let mut gallery = XmlDisplay::gallery(XML, DisplayOptions::default()).unwrap();
        let first = gallery.next().unwrap();
        assert_eq!(first.options().template, Template::titled());
        assert_eq!(
            first.options().extras.get(STYLE_NAME_EXTRA).map(String::as_str),
            Some(first.style())
        );
        let html = first.to_html().unwrap();
        assert!(html.contains(&format!("> {} </h3>", first.style())));
        assert!(html.ends_with("<hr/>"));
    }

    #[test]
    fn test_gallery_keeps_other_options() {
        let options = DisplayOptions::default().with_expand(true);
        let display = XmlDisplay::gallery(XML, options)
            .unwrap()
            .next()
            .unwrap();
        assert!(display.options().expand);
        assert!(display.body_content().contains("<details open>"));
    }

    #[test]
    fn test_each_call_restarts() {
        let first = XmlDisplay::gallery(XML, DisplayOptions::default()).unwrap();
        let second = XmlDisplay::gallery(XML, DisplayOptions::default()).unwrap();
        assert_eq!(first.count(), second.count());
    }

    #[test]
    fn test_render_gallery_contains_every_style() {
        let html = render_gallery(XML, DisplayOptions::default()).unwrap();
        let styles = available_styles();
        assert_eq!(html.matches("<hr/>").count(), styles.len());
        for style in styles {
            assert!(html.contains(&format!("> {style} </h3>")), "{style}");
        }
    }

    #[test]
    fn test_gallery_parse_error() {
        let err = XmlDisplay::gallery("<a>", DisplayOptions::default()).unwrap_err();
        assert!(matches!(err, DisplayError::Parse(_)));
    }
}
