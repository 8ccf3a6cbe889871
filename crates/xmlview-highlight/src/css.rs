//! CSS selector scoping.

use std::fmt::Write;

/// Prefix every selector in `css` with `scope`.
///
/// Works on the line-oriented output of `syntect`: a rule opens on a line
/// holding its comma-separated selectors and `{`. Comment blocks and
/// declaration lines are copied unchanged.
pub fn scope_css(css: &str, scope: &str) -> String {
    let mut out = String::with_capacity(css.len() + css.len() / 2);
    let mut in_comment = false;
    let mut in_rule = false;

    for line in css.lines() {
        let trimmed = line.trim_start();
        if in_comment {
            in_comment = !line.contains("*/");
        } else if trimmed.starts_with("/*") {
            in_comment = !trimmed.contains("*/");
        } else if in_rule {
            in_rule = !line.contains('}');
        } else if let Some((selectors, rest)) = line.split_once('{') {
            let scoped = selectors
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| format!("{scope} {s}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "{scoped} {{{rest}").unwrap();
            in_rule = !rest.contains('}');
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
