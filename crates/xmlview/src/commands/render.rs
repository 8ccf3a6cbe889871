//! `xmlview render` command implementation.

use clap::Args;
use xmlview_config::TemplateKind;
use xmlview_display::XmlDisplay;

use super::{DisplayArgs, display_options, write_html};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    display: DisplayArgs,

    /// Highlighting style (overrides config).
    #[arg(short, long, env = "XMLVIEW_STYLE")]
    style: Option<String>,

    /// Precede the output with a heading naming the style.
    #[arg(long)]
    titled: bool,
}

impl RenderArgs {
    pub(crate) fn verbose(&self) -> bool {
        self.display.verbose
    }

    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, parsing, highlighting or output fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self
            .display
            .load_config(self.style, self.titled.then_some(TemplateKind::Titled))?;
        let bytes = self.display.read_input()?;

        let xml_display = XmlDisplay::new(bytes, display_options(&config))?;
        tracing::info!(
            style = xml_display.style(),
            nodes = xml_display.root().node_count(),
            "Rendering document"
        );
        let html = xml_display.to_html()?;

        let path = config.output_resolved.path.as_deref();
        write_html(&html, path)?;
        if let Some(path) = path {
            output.success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }
}
