//! `xmlview gallery` command implementation.

use clap::Args;
use xmlview_display::render_gallery;

use super::{DisplayArgs, display_options, write_html};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the gallery command.
#[derive(Args)]
pub(crate) struct GalleryArgs {
    #[command(flatten)]
    display: DisplayArgs,
}

impl GalleryArgs {
    pub(crate) fn verbose(&self) -> bool {
        self.display.verbose
    }

    /// Execute the gallery command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, parsing or output fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.display.load_config(None, None)?;
        let bytes = self.display.read_input()?;

        // Style, template and title are replaced per entry
        let html = render_gallery(bytes, display_options(&config))?;

        let path = config.output_resolved.path.as_deref();
        write_html(&html, path)?;
        if let Some(path) = path {
            output.success(&format!("Wrote gallery to {}", path.display()));
        } else {
            output.info("Gallery written to stdout");
        }
        Ok(())
    }
}
