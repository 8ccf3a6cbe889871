//! xmlview CLI - Foldable XML viewer.
//!
//! Provides commands for:
//! - `render`: Render an XML document as a foldable HTML fragment
//! - `gallery`: Render a document once per highlighting style
//! - `styles`: List available highlighting styles

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GalleryArgs, RenderArgs};
use output::Output;

/// xmlview - Foldable, syntax-highlighted XML for HTML surfaces.
#[derive(Parser)]
#[command(name = "xmlview", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an XML document as foldable HTML.
    Render(RenderArgs),
    /// Render an XML document once per available style.
    Gallery(GalleryArgs),
    /// List available highlighting styles.
    Styles,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Render(args) => args.verbose(),
        Commands::Gallery(args) => args.verbose(),
        Commands::Styles => false,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Gallery(args) => args.execute(&output),
        Commands::Styles => commands::styles::execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
