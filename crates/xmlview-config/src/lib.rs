//! Configuration management for xmlview.
//!
//! Parses `xmlview.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `display.style`
//! - `output.path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "xmlview.toml";

/// Largest accepted indentation increment, in `em`.
const MAX_INDENT: usize = 64;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override highlighting style.
    pub style: Option<String>,
    /// Override fold-expanded flag.
    pub expand: Option<bool>,
    /// Override indentation increment.
    pub indent: Option<usize>,
    /// Override blank text handling.
    pub blank_text: Option<BlankTextMode>,
    /// Override wrapper template.
    pub template: Option<TemplateKind>,
    /// Override output file.
    pub output: Option<PathBuf>,
}

/// Handling of whitespace-only text in foldable output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankTextMode {
    /// Drop whitespace-only text and tail.
    #[default]
    Drop,
    /// Keep text exactly as in the source.
    Preserve,
}

/// Built-in wrapper template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Plain wrapper with scoped styles.
    #[default]
    Bare,
    /// Wrapper preceded by a style-name heading.
    Titled,
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Display configuration.
    pub display: DisplayConfig,
    /// Output configuration (path is a relative string from TOML).
    output: OutputConfigRaw,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Display configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Highlighting style name, or `"default"`.
    pub style: String,
    /// Open every fold by default.
    pub expand: bool,
    /// Indentation increment per depth level.
    pub indent: usize,
    /// Whitespace-only text handling.
    pub blank_text: BlankTextMode,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            style: "default".to_owned(),
            expand: false,
            indent: 1,
            blank_text: BlankTextMode::default(),
        }
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    template: Option<TemplateKind>,
    path: Option<String>,
}

/// Resolved output configuration with an absolute path.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Wrapper template.
    pub template: TemplateKind,
    /// File to write, or `None` for stdout.
    pub path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`display.style`").
        field: String,
        /// Error message (e.g., "${`XMLVIEW_STYLE`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `xmlview.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied last and take precedence.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(style) = &settings.style {
            self.display.style.clone_from(style);
        }
        if let Some(expand) = settings.expand {
            self.display.expand = expand;
        }
        if let Some(indent) = settings.indent {
            self.display.indent = indent;
        }
        if let Some(blank_text) = settings.blank_text {
            self.display.blank_text = blank_text;
        }
        if let Some(template) = settings.template {
            self.output_resolved.template = template;
        }
        if let Some(output) = &settings.output {
            self.output_resolved.path = Some(output.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.style.trim().is_empty() {
            return Err(ConfigError::Validation(
                "display.style cannot be empty".to_owned(),
            ));
        }
        if self.display.indent > MAX_INDENT {
            return Err(ConfigError::Validation(format!(
                "display.indent cannot exceed {MAX_INDENT}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.display.style = expand::expand_env(&self.display.style, "display.style")?;
        if let Some(path) = self.output.path.take() {
            self.output.path = Some(expand::expand_env(&path, "output.path")?);
        }
        Ok(())
    }

    /// Resolve the output path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output_resolved = OutputConfig {
            template: self.output.template.unwrap_or_default(),
            path: self.output.path.as_deref().map(|p| config_dir.join(p)),
        };
    }
}
