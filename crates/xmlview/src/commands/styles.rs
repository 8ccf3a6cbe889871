//! `xmlview styles` command implementation.

use std::io::Write;

use xmlview_highlight::{DEFAULT_STYLE, DEFAULT_THEME, available_styles};

use crate::error::CliError;

/// Execute the styles command.
///
/// Prints one style name per line; the theme behind `default` is marked.
pub(crate) fn execute() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    for line in style_lines() {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

fn style_lines() -> Vec<String> {
    available_styles()
        .into_iter()
        .map(|name| {
            if name == DEFAULT_THEME {
                format!("{name} ({DEFAULT_STYLE})")
            } else {
                name
            }
        })
        .collect()
}
