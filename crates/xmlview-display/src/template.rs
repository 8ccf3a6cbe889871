//! HTML wrapper templates with named slots.
//!
//! Slots are written `{name}`. The built-in slots are `{unique_class}`,
//! `{css_rules}` and `{body_content}`; `{extras.NAME}` looks up a named extra
//! value. `{{` and `}}` produce literal braces.

use std::borrow::Cow;
use std::collections::BTreeMap;

const BARE_TEMPLATE: &str = r#"
<div class="{unique_class}">
    <style>
        {css_rules}
    </style>
    {body_content}
</div>
"#;

const TITLE_HEADING: &str = r#"<h3 style="margin-bottom:.3em"> {extras.style_name} </h3>"#;

/// Template error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// Slot name is not known.
    #[error("unknown template slot {{{0}}}")]
    UnknownSlot(String),

    /// `{extras.NAME}` used without a value for NAME.
    #[error("missing extra value {0:?}")]
    MissingExtra(String),

    /// `{` without a closing `}`.
    #[error("unclosed slot at byte {0}")]
    UnclosedSlot(usize),

    /// `}` without an opening `{`.
    #[error("unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),
}

/// Values substituted into a [`Template`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    /// Per-instance CSS class.
    pub unique_class: &'a str,
    /// Scoped CSS rules.
    pub css_rules: &'a str,
    /// Rendered document body.
    pub body_content: &'a str,
    /// Named extra values for `{extras.NAME}`.
    pub extras: &'a BTreeMap<String, String>,
}

/// HTML wrapper template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: Cow<'static, str>,
}

impl Template {
    /// Create a template from source text.
    #[must_use]
    pub fn new(source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// A `div` carrying the unique class, a `style` element and the content.
    #[must_use]
    pub fn bare() -> Self {
        Self::new(BARE_TEMPLATE)
    }

    /// [`Template::bare`] preceded by a heading with the `style_name` extra
    /// and followed by a horizontal rule.
    #[must_use]
    pub fn titled() -> Self {
        Self::new(format!("{TITLE_HEADING}{BARE_TEMPLATE}<hr/>"))
    }

    /// Template source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fill every slot from `ctx`.
    pub fn render(&self, ctx: &TemplateContext<'_>) -> Result<String, TemplateError> {
        let source = self.source.as_ref();
        let mut out = String::with_capacity(
            source.len() + ctx.css_rules.len() + ctx.body_content.len() + ctx.unique_class.len(),
        );
        let mut rest = source;
        let mut offset = 0;

        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            let brace = &rest[pos..];

            if brace.starts_with("{{") {
                out.push('{');
                rest = &brace[2..];
                offset += pos + 2;
            } else if brace.starts_with("}}") {
                out.push('}');
                rest = &brace[2..];
                offset += pos + 2;
            } else if brace.starts_with('}') {
                return Err(TemplateError::UnmatchedBrace(offset + pos));
            } else {
                let end = brace[1..]
                    .find('}')
                    .ok_or(TemplateError::UnclosedSlot(offset + pos))?;
                let name = &brace[1..=end];
                out.push_str(lookup(name, ctx)?);
                rest = &brace[end + 2..];
                offset += pos + end + 2;
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::bare()
    }
}

fn lookup<'a>(name: &str, ctx: &TemplateContext<'a>) -> Result<&'a str, TemplateError> {
    match name {
        "unique_class" => Ok(ctx.unique_class),
        "css_rules" => Ok(ctx.css_rules),
        "body_content" => Ok(ctx.body_content),
        _ => {
            let key = name
                .strip_prefix("extras.")
                .ok_or_else(|| TemplateError::UnknownSlot(name.to_owned()))?;
            ctx.extras
                .get(key)
                .map(String::as_str)
                .ok_or_else(|| TemplateError::MissingExtra(key.to_owned()))
        }
    }
}
