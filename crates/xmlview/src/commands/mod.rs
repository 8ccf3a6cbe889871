//! CLI command implementations.

pub(crate) mod gallery;
pub(crate) mod render;
pub(crate) mod styles;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use xmlview_config::{BlankTextMode, CliSettings, Config, TemplateKind};
use xmlview_display::{BlankText, DisplayOptions, STYLE_NAME_EXTRA, Template};

use crate::error::CliError;

pub(crate) use gallery::GalleryArgs;
pub(crate) use render::RenderArgs;

/// Path argument meaning "read standard input".
const STDIN_PATH: &str = "-";

/// Arguments shared by `render` and `gallery`.
#[derive(Args)]
pub(crate) struct DisplayArgs {
    /// XML file to display, or `-` for standard input.
    input: PathBuf,

    /// Path to configuration file (default: auto-discover xmlview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write HTML to this file instead of stdout (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open every fold by default (overrides config).
    #[arg(long)]
    expand: bool,

    /// Indentation increment per nesting level, in em (overrides config).
    #[arg(long)]
    indent: Option<usize>,

    /// Keep whitespace-only text instead of dropping it (overrides config).
    #[arg(long)]
    keep_blank_text: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl DisplayArgs {
    /// Load config with the shared flags and the command-specific overrides.
    fn load_config(
        &self,
        style: Option<String>,
        template: Option<TemplateKind>,
    ) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            style,
            expand: self.expand.then_some(true),
            indent: self.indent,
            blank_text: self.keep_blank_text.then_some(BlankTextMode::Preserve),
            template,
            output: self.output.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Read the input file or standard input.
    fn read_input(&self) -> Result<Vec<u8>, CliError> {
        read_input(&self.input)
    }
}

/// Read XML bytes from `path`, or from stdin when `path` is `-`.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    let result = if path.as_os_str() == STDIN_PATH {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf).map(|_| buf)
    } else {
        std::fs::read(path)
    };
    result.map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `html` to `path`, or to stdout when no path is set.
pub(crate) fn write_html(html: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| CliError::WriteOutput {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(path, html).map_err(|source| CliError::WriteOutput {
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Convert loaded configuration into display options.
pub(crate) fn display_options(config: &Config) -> DisplayOptions {
    let blank_text = match config.display.blank_text {
        BlankTextMode::Drop => BlankText::Drop,
        BlankTextMode::Preserve => BlankText::Preserve,
    };
    let options = DisplayOptions::default()
        .with_style(config.display.style.clone())
        .with_expand(config.display.expand)
        .with_indent_increment(config.display.indent)
        .with_blank_text(blank_text);
    match config.output_resolved.template {
        TemplateKind::Bare => options,
        TemplateKind::Titled => options
            .with_template(Template::titled())
            .with_extra(STYLE_NAME_EXTRA, config.display.style.clone()),
    }
}
