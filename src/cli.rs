use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gamut")]
#[command(author, version)]
#[command(about = "A Markdown to HTML converter")]
#[command(
    long_about = "Gamut converts Markdown documents to HTML fragments. It follows the classic \
    Markdown syntax with fenced code blocks, and renders headers with generated ids."
)]
#[command(after_help = "\
EXAMPLES:

    # Convert a file to stdout
    gamut convert document.md

    # Convert from stdin
    cat document.md | gamut convert

    # Write the HTML to a file
    gamut convert --output document.html document.md

    # Use custom config
    gamut convert --config custom.toml document.md

    # Show the conversion passes
    gamut passes

CONFIGURATION:

Gamut looks for configuration files in this order:
  1. Explicit --config path
  2. gamut.toml or .gamut.toml in current/parent directories
  3. ~/.config/gamut/config.toml (XDG)
  4. Built-in defaults

Example .gamut.toml:

    omit-extra-wl-in-code-blocks = true")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, gamut will \
        search for .gamut.toml or gamut.toml in the current directory and its parents, \
        then fall back to ~/.config/gamut/config.toml."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a Markdown document to HTML
    #[command(
        long_about = "Convert a Markdown document to an HTML fragment. By default, outputs \
        the HTML to stdout. Use --output to write it to a file instead."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Convert to stdout
    gamut convert document.md

    # Convert from stdin
    echo '# Heading' | gamut convert

    # Fenced code blocks without the newline before </code>
    gamut convert --omit-extra-wl document.md")]
    Convert {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        #[arg(
            long_help = "Path to the Markdown file to convert. If not provided, reads from stdin."
        )]
        file: Option<PathBuf>,

        /// Write HTML to a file instead of stdout
        #[arg(long, short)]
        #[arg(help = "Output file path")]
        output: Option<PathBuf>,

        /// Omit the newline before </code> in fenced code blocks
        #[arg(long)]
        #[arg(help = "Omit the trailing newline in fenced code blocks")]
        #[arg(
            long_help = "Fenced code blocks normally end with a newline before the closing \
            </code> tag. This flag drops it, overriding the omit-extra-wl-in-code-blocks \
            configuration option."
        )]
        omit_extra_wl: bool,
    },
    /// List the conversion passes in the order they run
    Passes,
}
