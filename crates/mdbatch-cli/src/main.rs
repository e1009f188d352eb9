//! mdbatch CLI - batch Markdown to HTML rendering.
//!
//! Provides commands for:
//! - `render`: Render Markdown files (or stdin) to HTML
//! - `css`: Print the stylesheet for a highlight theme
//! - `themes`: List available highlight themes

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CssArgs, RenderArgs};
use output::Output;

/// mdbatch - batch Markdown to HTML rendering.
#[derive(Parser)]
#[command(name = "mdbatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render Markdown documents to HTML.
    Render(RenderArgs),
    /// Print the CSS for a highlight theme.
    Css(CssArgs),
    /// List available highlight themes.
    Themes,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

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
        Commands::Render(args) => args.execute(),
        Commands::Css(args) => args.execute(),
        Commands::Themes => commands::themes::execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
